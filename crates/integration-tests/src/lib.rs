//! End-to-end tests for Clementine.
//!
//! The tests in `tests/` drive the real HTTP adapters in
//! `clementine-client` against in-process stub servers for every vendor
//! API the client talks to. Nothing is mocked inside the client itself:
//! requests leave over loopback TCP, responses are parsed by the real
//! wire-shape code, and assertions run against both the client's observable
//! state and the stubs' recorded writes.
//!
//! # Test Categories
//!
//! - `catalog_streams` - repository reads and the tri-state contract
//! - `cart_flow` - cart invariants against the draft-order stub
//! - `auth_flow` - registration ordering, login, session routing
//! - `checkout_flow` - currency, payment session, order submission

pub mod stubs;

use std::path::PathBuf;

use secrecy::SecretString;

use clementine_client::{App, AppConfig};

use stubs::{STUB_ADMIN_TOKEN, StubCurrency, StubIdentity, StubPayments, StubPlatform};

/// Four stub servers, a config pointing at them, and the app on top.
pub struct TestContext {
    pub app: App,
    pub platform: StubPlatform,
    pub identity: StubIdentity,
    pub payments: StubPayments,
    pub currency: StubCurrency,
    config: AppConfig,
}

impl TestContext {
    /// Start all stubs and build the app against them, with a fresh
    /// temp-file preference store.
    pub async fn start() -> Self {
        let platform = StubPlatform::start().await;
        let identity = StubIdentity::start().await;
        let payments = StubPayments::start().await;
        let currency = StubCurrency::start().await;

        let prefs_path = std::env::temp_dir().join(format!(
            "clementine-it-{}.json",
            uuid::Uuid::new_v4()
        ));
        let config = AppConfig {
            store: "stub.myshopify.com".to_owned(),
            api_version: "2026-01".to_owned(),
            admin_url: platform.base_url(),
            admin_token: SecretString::from(STUB_ADMIN_TOKEN),
            identity_url: identity.base_url(),
            identity_key: SecretString::from("stub-identity-key"),
            payment_url: payments.base_url(),
            payment_secret_key: SecretString::from("sk_stub_key"),
            currency_url: currency.base_url(),
            currency_key: SecretString::from("stub-currency-key"),
            shop_currency: "USD".to_owned(),
            prefs_path,
        };
        let app = App::new(config.clone()).expect("build app against stubs");

        Self {
            app,
            platform,
            identity,
            payments,
            currency,
            config,
        }
    }

    /// Build a second app over the same stubs and preference file, as if
    /// the process had been restarted.
    pub fn restarted_app(&self) -> App {
        App::new(self.config.clone()).expect("rebuild app against stubs")
    }

    /// The preference file backing this context.
    #[must_use]
    pub fn prefs_path(&self) -> &PathBuf {
        &self.config.prefs_path
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.config.prefs_path);
    }
}
