//! Stub of the currency exchange API. Fixed rates, deterministic results.

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::extract::Query;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde_json::json;
use tokio::sync::watch;
use url::Url;

/// Rate applied to every conversion.
pub const STUB_RATE: &str = "0.9";

/// The running stub exchange API.
pub struct StubCurrency {
    pub addr: SocketAddr,
    shutdown: watch::Sender<bool>,
}

impl StubCurrency {
    /// Start the stub on an ephemeral port.
    pub async fn start() -> Self {
        let router = Router::new().route("/convert", get(convert));
        let (addr, shutdown) = super::serve(router).await;
        Self { addr, shutdown }
    }

    /// Base URL for `AppConfig::currency_url`.
    #[must_use]
    pub fn base_url(&self) -> Url {
        super::base_url(self.addr)
    }
}

impl Drop for StubCurrency {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

async fn convert(Query(params): Query<HashMap<String, String>>) -> Response {
    let rate: Decimal = STUB_RATE.parse().expect("stub rate");
    let amount: Decimal = params
        .get("amount")
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default();

    Json(json!({
        "success": true,
        "query": {
            "from": params.get("from"),
            "to": params.get("to"),
            "amount": amount,
        },
        "info": {"rate": rate},
        "result": amount * rate,
    }))
    .into_response()
}
