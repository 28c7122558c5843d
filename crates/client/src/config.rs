//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CLEMENTINE_STORE` - Platform store domain (e.g., your-store.myshopify.com)
//! - `CLEMENTINE_ADMIN_TOKEN` - Admin API access token
//! - `CLEMENTINE_IDENTITY_KEY` - Identity provider API key
//! - `CLEMENTINE_PAYMENT_SECRET_KEY` - Payment processor secret key
//! - `CLEMENTINE_CURRENCY_KEY` - Currency exchange API key
//!
//! ## Optional
//! - `CLEMENTINE_API_VERSION` - Admin API version (default: 2026-01)
//! - `CLEMENTINE_ADMIN_URL` - Admin API base URL (default: https://{store})
//! - `CLEMENTINE_IDENTITY_URL` - Identity provider base URL
//! - `CLEMENTINE_PAYMENT_URL` - Payment processor base URL
//! - `CLEMENTINE_CURRENCY_URL` - Currency exchange base URL
//! - `CLEMENTINE_SHOP_CURRENCY` - Shop currency code (default: USD)
//! - `CLEMENTINE_PREFS_PATH` - Preference store file (default: clementine-prefs.json)
//!
//! The base-URL overrides exist so tests can point the client at in-process
//! stub servers; production deployments only set the store domain and keys.

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_VERSION: &str = "2026-01";
const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com";
const DEFAULT_PAYMENT_URL: &str = "https://api.stripe.com";
const DEFAULT_CURRENCY_URL: &str = "https://api.apilayer.com/currency_data";
const DEFAULT_PREFS_PATH: &str = "clementine-prefs.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client application configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct AppConfig {
    /// Platform store domain (e.g., your-store.myshopify.com)
    pub store: String,
    /// Admin API version segment (e.g., 2026-01)
    pub api_version: String,
    /// Admin API base URL
    pub admin_url: Url,
    /// Admin API access token
    pub admin_token: SecretString,
    /// Identity provider base URL
    pub identity_url: Url,
    /// Identity provider API key
    pub identity_key: SecretString,
    /// Payment processor base URL
    pub payment_url: Url,
    /// Payment processor secret key
    pub payment_secret_key: SecretString,
    /// Currency exchange base URL
    pub currency_url: Url,
    /// Currency exchange API key
    pub currency_key: SecretString,
    /// Shop currency code (ISO 4217)
    pub shop_currency: String,
    /// Preference store file path
    pub prefs_path: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("admin_url", &self.admin_url.as_str())
            .field("admin_token", &"[REDACTED]")
            .field("identity_url", &self.identity_url.as_str())
            .field("identity_key", &"[REDACTED]")
            .field("payment_url", &self.payment_url.as_str())
            .field("payment_secret_key", &"[REDACTED]")
            .field("currency_url", &self.currency_url.as_str())
            .field("currency_key", &"[REDACTED]")
            .field("shop_currency", &self.shop_currency)
            .field("prefs_path", &self.prefs_path)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or a URL
    /// variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let store = get_required_env("CLEMENTINE_STORE")?;
        let admin_url = match get_optional_env("CLEMENTINE_ADMIN_URL") {
            Some(raw) => parse_url("CLEMENTINE_ADMIN_URL", &raw)?,
            None => parse_url("CLEMENTINE_STORE", &format!("https://{store}"))?,
        };

        Ok(Self {
            store,
            api_version: get_env_or_default("CLEMENTINE_API_VERSION", DEFAULT_API_VERSION),
            admin_url,
            admin_token: get_required_secret("CLEMENTINE_ADMIN_TOKEN")?,
            identity_url: get_url_or_default("CLEMENTINE_IDENTITY_URL", DEFAULT_IDENTITY_URL)?,
            identity_key: get_required_secret("CLEMENTINE_IDENTITY_KEY")?,
            payment_url: get_url_or_default("CLEMENTINE_PAYMENT_URL", DEFAULT_PAYMENT_URL)?,
            payment_secret_key: get_required_secret("CLEMENTINE_PAYMENT_SECRET_KEY")?,
            currency_url: get_url_or_default("CLEMENTINE_CURRENCY_URL", DEFAULT_CURRENCY_URL)?,
            currency_key: get_required_secret("CLEMENTINE_CURRENCY_KEY")?,
            shop_currency: get_env_or_default("CLEMENTINE_SHOP_CURRENCY", "USD"),
            prefs_path: PathBuf::from(get_env_or_default(
                "CLEMENTINE_PREFS_PATH",
                DEFAULT_PREFS_PATH,
            )),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a URL, attributing failures to the variable that supplied it.
fn parse_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Get a URL environment variable with a default value.
fn get_url_or_default(key: &str, default: &str) -> Result<Url, ConfigError> {
    parse_url(key, &get_env_or_default(key, default))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_config() -> AppConfig {
        AppConfig {
            store: "demo.myshopify.com".to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            admin_url: Url::parse("https://demo.myshopify.com").unwrap(),
            admin_token: SecretString::from("shpat_abc123"),
            identity_url: Url::parse(DEFAULT_IDENTITY_URL).unwrap(),
            identity_key: SecretString::from("identity_key_value"),
            payment_url: Url::parse(DEFAULT_PAYMENT_URL).unwrap(),
            payment_secret_key: SecretString::from("sk_test_abc123"),
            currency_url: Url::parse(DEFAULT_CURRENCY_URL).unwrap(),
            currency_key: SecretString::from("currency_key_value"),
            shop_currency: "USD".to_string(),
            prefs_path: PathBuf::from(DEFAULT_PREFS_PATH),
        }
    }

    #[test]
    fn test_parse_url_rejects_garbage() {
        let err = parse_url("TEST_URL", "not a url").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
        assert!(err.to_string().contains("TEST_URL"));
    }

    #[test]
    fn test_parse_url_accepts_loopback() {
        let url = parse_url("TEST_URL", "http://127.0.0.1:4010").unwrap();
        assert_eq!(url.port(), Some(4010));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = sample_config();
        let debug_output = format!("{config:?}");

        // Public fields should be visible
        assert!(debug_output.contains("demo.myshopify.com"));

        // Secret fields should be redacted
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("shpat_abc123"));
        assert!(!debug_output.contains("sk_test_abc123"));
    }
}
