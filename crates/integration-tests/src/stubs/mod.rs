//! In-process stub servers for the four vendor APIs.
//!
//! Each stub binds an ephemeral loopback port, serves an axum router over
//! shared in-memory state, and shuts down when dropped. Tests reach into
//! the state handle to seed fixtures and to assert on what the client
//! actually wrote.

pub mod currency;
pub mod identity;
pub mod payment;
pub mod platform;

pub use currency::StubCurrency;
pub use identity::StubIdentity;
pub use payment::StubPayments;
pub use platform::{STUB_ADMIN_TOKEN, StubPlatform};

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use url::Url;

/// Serve a router on an ephemeral loopback port, returning the address and
/// a shutdown trigger.
pub(crate) async fn serve(router: Router) -> (SocketAddr, watch::Sender<bool>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub server");
    let addr = listener.local_addr().expect("stub server local addr");

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.changed().await;
            })
            .await
            .ok();
    });

    (addr, shutdown_tx)
}

/// `http://` URL for a stub server address.
pub(crate) fn base_url(addr: SocketAddr) -> Url {
    Url::parse(&format!("http://{addr}")).expect("stub server URL")
}
