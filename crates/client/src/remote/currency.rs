//! Currency exchange client.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;
use url::Url;

use super::check_status;
use crate::config::AppConfig;
use crate::error::ClientError;
use crate::models::ExchangeResult;

/// Exchange-rate lookups for displaying prices in the shopper's currency.
#[async_trait]
pub trait CurrencyApi: Send + Sync {
    /// Convert `amount` from one currency to another.
    async fn exchange_rate(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
    ) -> Result<ExchangeResult, ClientError>;
}

/// REST-backed [`CurrencyApi`].
#[derive(Clone)]
pub struct CurrencyRemote {
    inner: Arc<CurrencyRemoteInner>,
}

struct CurrencyRemoteInner {
    client: reqwest::Client,
    base_url: Url,
    api_key: SecretString,
}

impl CurrencyRemote {
    /// Create a new currency client from configuration.
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self::with_base_url(config.currency_url.clone(), config.currency_key.clone())
    }

    /// Create a client against an explicit base URL.
    #[must_use]
    pub fn with_base_url(base_url: Url, api_key: SecretString) -> Self {
        Self {
            inner: Arc::new(CurrencyRemoteInner {
                client: reqwest::Client::new(),
                base_url,
                api_key,
            }),
        }
    }
}

#[async_trait]
impl CurrencyApi for CurrencyRemote {
    #[instrument(skip(self), fields(from = %from, to = %to))]
    async fn exchange_rate(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
    ) -> Result<ExchangeResult, ClientError> {
        let url = format!(
            "{}/convert?to={to}&from={from}&amount={amount}",
            self.inner.base_url.as_str().trim_end_matches('/')
        );
        let response = self
            .inner
            .client
            .get(url)
            .header("apikey", self.inner.api_key.expose_secret())
            .send()
            .await?;
        let response = check_status("currency", response).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}
