//! Stub of the identity provider's `accounts:` REST dialect.
//!
//! Speaks the same request/response JSON as the real provider: camelCase
//! bodies, an API key query parameter, and rejections shaped as
//! `{"error": {"message": "EMAIL_EXISTS"}}`.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use tokio::sync::{Mutex, watch};
use url::Url;

/// One provisioned account.
#[derive(Debug, Clone)]
pub struct IdentityRecord {
    /// `None` for accounts created through the federated flow.
    pub password: Option<String>,
    pub local_id: String,
    /// The linked platform customer id attribute.
    pub customer_id: Option<i64>,
}

/// Everything the stub provider remembers.
#[derive(Debug, Default)]
pub struct IdentityData {
    /// Accounts by email.
    pub accounts: HashMap<String, IdentityRecord>,
    /// Issued session tokens → email.
    pub tokens: HashMap<String, String>,
}

impl IdentityData {
    fn issue_token(&mut self, email: &str) -> String {
        let token = format!("tok-{}", uuid::Uuid::new_v4());
        self.tokens.insert(token.clone(), email.to_owned());
        token
    }
}

type SharedData = Arc<Mutex<IdentityData>>;

/// The running stub provider.
pub struct StubIdentity {
    pub addr: SocketAddr,
    pub state: SharedData,
    shutdown: watch::Sender<bool>,
}

impl StubIdentity {
    /// Start the stub on an ephemeral port.
    pub async fn start() -> Self {
        let state: SharedData = Arc::default();

        let router = Router::new()
            .route("/v1/accounts:signUp", post(sign_up))
            .route("/v1/accounts:signInWithPassword", post(sign_in))
            .route("/v1/accounts:signInWithIdp", post(sign_in_federated))
            .route("/v1/accounts:update", post(update_attributes))
            .route("/v1/accounts:lookup", post(lookup))
            .with_state(Arc::clone(&state));

        let (addr, shutdown) = super::serve(router).await;
        Self {
            addr,
            state,
            shutdown,
        }
    }

    /// Base URL for `AppConfig::identity_url`.
    #[must_use]
    pub fn base_url(&self) -> Url {
        super::base_url(self.addr)
    }

    /// Seed a password account, optionally linked to a platform customer.
    pub async fn seed_account(&self, email: &str, password: &str, customer_id: Option<i64>) {
        self.state.lock().await.accounts.insert(
            email.to_owned(),
            IdentityRecord {
                password: Some(password.to_owned()),
                local_id: format!("uid-{email}"),
                customer_id,
            },
        );
    }
}

impl Drop for StubIdentity {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

fn rejection(code: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": {"code": 400, "message": code}})),
    )
        .into_response()
}

fn account_response(record: &IdentityRecord, email: &str, token: String) -> Response {
    Json(json!({
        "localId": record.local_id,
        "email": email,
        "idToken": token,
    }))
    .into_response()
}

async fn sign_up(State(state): State<SharedData>, Json(body): Json<serde_json::Value>) -> Response {
    let mut data = state.lock().await;
    let email = body["email"].as_str().unwrap_or_default().to_owned();
    if data.accounts.contains_key(&email) {
        return rejection("EMAIL_EXISTS");
    }

    let record = IdentityRecord {
        password: Some(body["password"].as_str().unwrap_or_default().to_owned()),
        local_id: format!("uid-{email}"),
        customer_id: None,
    };
    data.accounts.insert(email.clone(), record.clone());
    let token = data.issue_token(&email);
    account_response(&record, &email, token)
}

async fn sign_in(State(state): State<SharedData>, Json(body): Json<serde_json::Value>) -> Response {
    let mut data = state.lock().await;
    let email = body["email"].as_str().unwrap_or_default().to_owned();
    let Some(record) = data.accounts.get(&email).cloned() else {
        return rejection("EMAIL_NOT_FOUND");
    };
    if record.password.as_deref() != body["password"].as_str() {
        return rejection("INVALID_PASSWORD");
    }

    let token = data.issue_token(&email);
    account_response(&record, &email, token)
}

/// Federated tokens in the stub are `fed:<email>`; anything else is
/// rejected the way the provider rejects an unverifiable assertion.
async fn sign_in_federated(
    State(state): State<SharedData>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let mut data = state.lock().await;
    let post_body = body["postBody"].as_str().unwrap_or_default();
    let Some(email) = post_body
        .split('&')
        .find_map(|pair| pair.strip_prefix("id_token=fed:"))
        .map(str::to_owned)
    else {
        return rejection("INVALID_IDP_RESPONSE");
    };

    let record = data
        .accounts
        .entry(email.clone())
        .or_insert_with(|| IdentityRecord {
            password: None,
            local_id: format!("uid-{email}"),
            customer_id: None,
        })
        .clone();
    let token = data.issue_token(&email);
    account_response(&record, &email, token)
}

async fn update_attributes(
    State(state): State<SharedData>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let mut data = state.lock().await;
    let Some(email) = body["idToken"]
        .as_str()
        .and_then(|token| data.tokens.get(token))
        .cloned()
    else {
        return rejection("INVALID_ID_TOKEN");
    };

    let Some(record) = data.accounts.get_mut(&email) else {
        return rejection("USER_NOT_FOUND");
    };
    record.customer_id = body["customerId"].as_i64();
    Json(json!({"localId": record.local_id})).into_response()
}

async fn lookup(State(state): State<SharedData>, Json(body): Json<serde_json::Value>) -> Response {
    let data = state.lock().await;
    let Some(email) = body["idToken"]
        .as_str()
        .and_then(|token| data.tokens.get(token))
    else {
        return rejection("INVALID_ID_TOKEN");
    };

    let Some(record) = data.accounts.get(email) else {
        return rejection("USER_NOT_FOUND");
    };
    Json(json!({
        "users": [{
            "localId": record.local_id,
            "email": email,
            "customerId": record.customer_id,
        }]
    }))
    .into_response()
}
