//! Stub of the payment processor: form-encoded, bearer-authenticated.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Form, State};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use tokio::sync::{Mutex, watch};
use url::Url;

/// A payment intent the stub has issued.
#[derive(Debug, Clone)]
pub struct RecordedIntent {
    pub customer_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub idempotency_key: Option<String>,
}

/// Everything the stub processor remembers.
#[derive(Debug, Default)]
pub struct PaymentData {
    pub customers: Vec<String>,
    pub ephemeral_keys_issued: usize,
    pub intents: Vec<RecordedIntent>,
}

type SharedData = Arc<Mutex<PaymentData>>;

/// The running stub processor.
pub struct StubPayments {
    pub addr: SocketAddr,
    pub state: SharedData,
    shutdown: watch::Sender<bool>,
}

impl StubPayments {
    /// Start the stub on an ephemeral port.
    pub async fn start() -> Self {
        let state: SharedData = Arc::default();

        let router = Router::new()
            .route("/v1/customers", post(create_customer))
            .route("/v1/ephemeral_keys", post(create_ephemeral_key))
            .route("/v1/payment_intents", post(create_payment_intent))
            .with_state(Arc::clone(&state));

        let (addr, shutdown) = super::serve(router).await;
        Self {
            addr,
            state,
            shutdown,
        }
    }

    /// Base URL for `AppConfig::payment_url`.
    #[must_use]
    pub fn base_url(&self) -> Url {
        super::base_url(self.addr)
    }
}

impl Drop for StubPayments {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

async fn create_customer(State(state): State<SharedData>) -> Response {
    let mut data = state.lock().await;
    let id = format!("cus_stub_{}", data.customers.len() + 1);
    data.customers.push(id.clone());
    Json(json!({"id": id, "object": "customer"})).into_response()
}

async fn create_ephemeral_key(
    State(state): State<SharedData>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let mut data = state.lock().await;
    data.ephemeral_keys_issued += 1;
    let customer = form.get("customer").cloned().unwrap_or_default();
    Json(json!({
        "id": format!("ephkey_stub_{}", data.ephemeral_keys_issued),
        "secret": format!("ek_secret_{customer}_{}", data.ephemeral_keys_issued),
    }))
    .into_response()
}

async fn create_payment_intent(
    State(state): State<SharedData>,
    headers: axum::http::HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let mut data = state.lock().await;
    let intent = RecordedIntent {
        customer_id: form.get("customer").cloned().unwrap_or_default(),
        amount_minor: form
            .get("amount")
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default(),
        currency: form.get("currency").cloned().unwrap_or_default(),
        idempotency_key: headers
            .get("Idempotency-Key")
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned),
    };
    data.intents.push(intent.clone());

    Json(json!({
        "id": format!("pi_stub_{}", data.intents.len()),
        "client_secret": format!("pi_stub_{}_secret", data.intents.len()),
        "amount": intent.amount_minor,
        "currency": intent.currency,
    }))
    .into_response()
}
