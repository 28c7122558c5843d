//! Payment-processor client: customer, ephemeral key, payment intent.
//!
//! The processor's API is form-encoded and bearer-authenticated with the
//! secret key. Intent creation carries an idempotency key so a retried tap
//! cannot double-charge.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;
use url::Url;

use super::check_status;
use crate::config::AppConfig;
use crate::error::ClientError;
use crate::models::{EphemeralKey, PaymentCustomer, PaymentIntent};

/// Pinned processor API version for ephemeral keys; the mobile payment
/// sheet requires the key and the SDK to agree on it.
const PROCESSOR_VERSION: &str = "2024-06-20";

/// Checkout operations against the payment processor.
#[async_trait]
pub trait PaymentsApi: Send + Sync {
    /// Create a processor-side customer record to attach payments to.
    async fn create_customer(&self) -> Result<PaymentCustomer, ClientError>;

    /// Issue a short-lived key scoped to one customer.
    async fn create_ephemeral_key(&self, customer_id: &str)
    -> Result<EphemeralKey, ClientError>;

    /// Create a payment intent for an amount in minor units.
    async fn create_payment_intent(
        &self,
        customer_id: &str,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentIntent, ClientError>;
}

/// REST-backed [`PaymentsApi`].
#[derive(Clone)]
pub struct PaymentRemote {
    inner: Arc<PaymentRemoteInner>,
}

struct PaymentRemoteInner {
    client: reqwest::Client,
    base_url: Url,
    secret_key: SecretString,
}

impl PaymentRemote {
    /// Create a new payment client from configuration.
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self::with_base_url(config.payment_url.clone(), config.payment_secret_key.clone())
    }

    /// Create a client against an explicit base URL.
    #[must_use]
    pub fn with_base_url(base_url: Url, secret_key: SecretString) -> Self {
        Self {
            inner: Arc::new(PaymentRemoteInner {
                client: reqwest::Client::new(),
                base_url,
                secret_key,
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/v1/{path}",
            self.inner.base_url.as_str().trim_end_matches('/')
        )
    }

    async fn post_form<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, String)],
        idempotency_key: Option<String>,
    ) -> Result<T, ClientError> {
        let mut request = self
            .inner
            .client
            .post(self.url(path))
            .bearer_auth(self.inner.secret_key.expose_secret())
            .header("Stripe-Version", PROCESSOR_VERSION)
            .form(form);
        if let Some(key) = idempotency_key {
            request = request.header("Idempotency-Key", key);
        }

        let response = request.send().await?;
        let response = check_status("payment", response).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl PaymentsApi for PaymentRemote {
    #[instrument(skip(self))]
    async fn create_customer(&self) -> Result<PaymentCustomer, ClientError> {
        self.post_form("customers", &[], None).await
    }

    #[instrument(skip(self, customer_id))]
    async fn create_ephemeral_key(
        &self,
        customer_id: &str,
    ) -> Result<EphemeralKey, ClientError> {
        self.post_form(
            "ephemeral_keys",
            &[("customer", customer_id.to_owned())],
            None,
        )
        .await
    }

    #[instrument(skip(self, customer_id))]
    async fn create_payment_intent(
        &self,
        customer_id: &str,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentIntent, ClientError> {
        self.post_form(
            "payment_intents",
            &[
                ("amount", amount_minor.to_string()),
                ("currency", currency.to_owned()),
                ("customer", customer_id.to_owned()),
                ("automatic_payment_methods[enabled]", "true".to_owned()),
            ],
            Some(uuid::Uuid::new_v4().to_string()),
        )
        .await
    }
}
