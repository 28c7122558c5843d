//! HTTP adapters for the vendor APIs.
//!
//! # Architecture
//!
//! - The platform is source of truth - no local sync, direct API calls
//! - One shared `reqwest::Client` per vendor, wrapped in an `Arc`ed inner
//!   struct so adapters are cheap to clone
//! - Every adapter catches transport failures and non-success statuses at
//!   this boundary and converts them to [`ClientError`]; no retries, no
//!   circuit breaking
//! - Each vendor surface is a trait so repositories and managers can be
//!   exercised against in-memory stubs
//!
//! # APIs
//!
//! - [`products`], [`customers`], [`draft_orders`], [`orders`] - the
//!   platform's versioned admin REST API, token header per request
//! - [`identity`] - identity provider credential issuance and verification
//! - [`payment`] - payment processor customer/ephemeral-key/intent creation
//! - [`currency`] - exchange-rate lookups

pub mod currency;
pub mod customers;
pub mod draft_orders;
pub mod identity;
pub mod orders;
pub mod payment;
pub mod products;

pub use currency::{CurrencyApi, CurrencyRemote};
pub use customers::{CustomersApi, CustomerRemote};
pub use draft_orders::{DraftOrdersApi, DraftOrderRemote};
pub use identity::{IdentityAccount, IdentityApi, IdentityError, IdentityRemote};
pub use orders::{OrderRemote, OrdersApi};
pub use payment::{PaymentRemote, PaymentsApi};
pub use products::{ProductRemote, ProductsApi};

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::AppConfig;
use crate::error::ClientError;

/// Header carrying the admin API access token.
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Client for the platform's versioned admin REST API.
///
/// Owns the base URL, the API-version path segment, and the access token;
/// the per-resource adapters share one instance and add their paths on top.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    base_url: Url,
    api_version: String,
    access_token: SecretString,
}

impl AdminClient {
    /// Create a new admin API client from configuration.
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self::with_base_url(
            config.admin_url.clone(),
            config.api_version.clone(),
            config.admin_token.clone(),
        )
    }

    /// Create a client against an explicit base URL.
    #[must_use]
    pub fn with_base_url(base_url: Url, api_version: String, access_token: SecretString) -> Self {
        Self {
            inner: Arc::new(AdminClientInner {
                client: reqwest::Client::new(),
                base_url,
                api_version,
                access_token,
            }),
        }
    }

    /// Build the versioned URL for a resource path like `products.json`.
    fn url(&self, path: &str) -> String {
        format!(
            "{}/admin/api/{}/{}",
            self.inner.base_url.as_str().trim_end_matches('/'),
            self.inner.api_version,
            path
        )
    }

    /// GET a resource and decode its JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self
            .inner
            .client
            .get(self.url(path))
            .header(ACCESS_TOKEN_HEADER, self.inner.access_token.expose_secret())
            .send()
            .await?;
        Self::decode(response).await
    }

    /// POST a JSON body and decode the response.
    pub(crate) async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self
            .inner
            .client
            .post(self.url(path))
            .header(ACCESS_TOKEN_HEADER, self.inner.access_token.expose_secret())
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// PUT a JSON body and decode the response.
    pub(crate) async fn put<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self
            .inner
            .client
            .put(self.url(path))
            .header(ACCESS_TOKEN_HEADER, self.inner.access_token.expose_secret())
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// DELETE a resource, discarding any response body.
    pub(crate) async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let response = self
            .inner
            .client
            .delete(self.url(path))
            .header(ACCESS_TOKEN_HEADER, self.inner.access_token.expose_secret())
            .send()
            .await?;
        check_status("admin", response).await?;
        Ok(())
    }

    /// Uniform status check and JSON decode for admin responses.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let response = check_status("admin", response).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Convert a non-success response into [`ClientError::Status`], consuming
/// the body for the excerpt. Success responses pass through untouched.
pub(crate) async fn check_status(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!(service, status = status.as_u16(), "vendor API returned non-success status");
    Err(ClientError::Status {
        service,
        status: status.as_u16(),
        body: ClientError::excerpt(&body),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_follow_the_versioned_path_scheme() {
        let client = AdminClient::with_base_url(
            Url::parse("https://demo.myshopify.com").expect("url"),
            "2026-01".to_owned(),
            SecretString::from("token"),
        );
        assert_eq!(
            client.url("products.json"),
            "https://demo.myshopify.com/admin/api/2026-01/products.json"
        );
        assert_eq!(
            client.url("draft_orders/42.json"),
            "https://demo.myshopify.com/admin/api/2026-01/draft_orders/42.json"
        );
    }
}
