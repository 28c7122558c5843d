//! Identity provider client: credential issuance and verification.
//!
//! The provider speaks a REST dialect keyed by an API key query parameter:
//! `accounts:signUp`, `accounts:signInWithPassword`, `accounts:signInWithIdp`
//! (federated), `accounts:update`, and `accounts:lookup`. The platform
//! customer id is stored on the account as a custom attribute, which is what
//! links the two identity systems together.
//!
//! Provider rejections arrive as `{"error": {"message": "EMAIL_EXISTS"}}`
//! and are mapped to a typed [`IdentityError`] so callers can distinguish a
//! duplicate email from a bad credential.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use clementine_core::CustomerId;

use super::check_status;
use crate::config::AppConfig;
use crate::error::ClientError;

/// A rejection the identity provider actually produced, as opposed to a
/// transport failure reaching it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// An account with this email already exists.
    #[error("email already registered")]
    DuplicateEmail,
    /// The email/password pair (or federated token) did not verify.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Any other provider rejection, with the provider's code.
    #[error("rejected: {0}")]
    Rejected(String),
}

impl IdentityError {
    /// Map a provider rejection code to the typed error.
    fn from_code(code: &str) -> Self {
        match code {
            "EMAIL_EXISTS" => Self::DuplicateEmail,
            "INVALID_PASSWORD" | "EMAIL_NOT_FOUND" | "INVALID_LOGIN_CREDENTIALS"
            | "INVALID_IDP_RESPONSE" => Self::InvalidCredentials,
            other => Self::Rejected(other.to_owned()),
        }
    }

    /// A short message suitable for showing to the shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::DuplicateEmail => "This email is already registered.".to_owned(),
            Self::InvalidCredentials => "Email or password is incorrect.".to_owned(),
            Self::Rejected(_) => "Sign-in was rejected. Please try again.".to_owned(),
        }
    }
}

/// An authenticated identity-provider account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityAccount {
    /// The provider's account id.
    pub local_id: String,
    /// The verified email.
    pub email: String,
    /// Session token for subsequent attribute reads and writes.
    pub id_token: String,
}

/// Credential operations against the identity provider.
#[async_trait]
pub trait IdentityApi: Send + Sync {
    /// Create a password credential.
    async fn sign_up(&self, email: &str, password: &str) -> Result<IdentityAccount, ClientError>;

    /// Verify a password credential.
    async fn sign_in(&self, email: &str, password: &str) -> Result<IdentityAccount, ClientError>;

    /// Verify a federated credential using the provider's id token.
    async fn sign_in_federated(&self, provider_token: &str)
    -> Result<IdentityAccount, ClientError>;

    /// Bind the platform customer id to the account as an attribute.
    async fn set_customer_id(
        &self,
        id_token: &str,
        customer_id: CustomerId,
    ) -> Result<(), ClientError>;

    /// Read the bound platform customer id, if one was ever set.
    async fn customer_id(&self, id_token: &str) -> Result<Option<CustomerId>, ClientError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire shapes
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FederatedRequest<'a> {
    post_body: String,
    request_uri: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest<'a> {
    id_token: &'a str,
    customer_id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    id_token: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    #[serde(default)]
    customer_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RejectionEnvelope {
    error: Rejection,
}

#[derive(Debug, Deserialize)]
struct Rejection {
    message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// REST-backed [`IdentityApi`].
#[derive(Clone)]
pub struct IdentityRemote {
    inner: Arc<IdentityRemoteInner>,
}

struct IdentityRemoteInner {
    client: reqwest::Client,
    base_url: Url,
    api_key: SecretString,
}

impl IdentityRemote {
    /// Create a new identity client from configuration.
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self::with_base_url(config.identity_url.clone(), config.identity_key.clone())
    }

    /// Create a client against an explicit base URL.
    #[must_use]
    pub fn with_base_url(base_url: Url, api_key: SecretString) -> Self {
        Self {
            inner: Arc::new(IdentityRemoteInner {
                client: reqwest::Client::new(),
                base_url,
                api_key,
            }),
        }
    }

    fn url(&self, action: &str) -> String {
        format!(
            "{}/v1/accounts:{action}?key={}",
            self.inner.base_url.as_str().trim_end_matches('/'),
            self.inner.api_key.expose_secret()
        )
    }

    /// POST to one `accounts:` action, mapping provider rejections to
    /// [`IdentityError`] before the generic status check runs.
    async fn call<B: Serialize + Sync, T: serde::de::DeserializeOwned>(
        &self,
        action: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self
            .inner
            .client
            .post(self.url(action))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() {
            let text = response.text().await?;
            if let Ok(envelope) = serde_json::from_str::<RejectionEnvelope>(&text) {
                return Err(IdentityError::from_code(&envelope.error.message).into());
            }
            return Err(ClientError::Status {
                service: "identity",
                status: status.as_u16(),
                body: ClientError::excerpt(&text),
            });
        }

        let response = check_status("identity", response).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl IdentityApi for IdentityRemote {
    #[instrument(skip(self, password), fields(email = %email))]
    async fn sign_up(&self, email: &str, password: &str) -> Result<IdentityAccount, ClientError> {
        let account: AccountResponse = self
            .call(
                "signUp",
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;
        Ok(account.into())
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn sign_in(&self, email: &str, password: &str) -> Result<IdentityAccount, ClientError> {
        let account: AccountResponse = self
            .call(
                "signInWithPassword",
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;
        Ok(account.into())
    }

    #[instrument(skip_all)]
    async fn sign_in_federated(
        &self,
        provider_token: &str,
    ) -> Result<IdentityAccount, ClientError> {
        let account: AccountResponse = self
            .call(
                "signInWithIdp",
                &FederatedRequest {
                    post_body: format!("id_token={provider_token}&providerId=google.com"),
                    request_uri: "http://localhost",
                    return_secure_token: true,
                },
            )
            .await?;
        Ok(account.into())
    }

    #[instrument(skip(self, id_token), fields(customer_id = %customer_id))]
    async fn set_customer_id(
        &self,
        id_token: &str,
        customer_id: CustomerId,
    ) -> Result<(), ClientError> {
        let _: serde_json::Value = self
            .call(
                "update",
                &UpdateRequest {
                    id_token,
                    customer_id: customer_id.as_i64(),
                },
            )
            .await?;
        Ok(())
    }

    #[instrument(skip_all)]
    async fn customer_id(&self, id_token: &str) -> Result<Option<CustomerId>, ClientError> {
        let lookup: LookupResponse = self.call("lookup", &LookupRequest { id_token }).await?;
        Ok(lookup
            .users
            .into_iter()
            .next()
            .and_then(|user| user.customer_id)
            .map(CustomerId::new))
    }
}

impl From<AccountResponse> for IdentityAccount {
    fn from(account: AccountResponse) -> Self {
        Self {
            local_id: account.local_id,
            email: account.email,
            id_token: account.id_token,
        }
    }
}
