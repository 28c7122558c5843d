//! Cart screen: the line list with quantity controls.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::warn;

use clementine_core::VariantId;

use super::{TaskScope, notice_channel};
use crate::managers::CartManager;
use crate::models::LineItem;

/// State holder for the cart screen.
pub struct CartController {
    cart: Arc<CartManager>,
    scope: TaskScope,
    notice: watch::Sender<Option<String>>,
}

impl CartController {
    /// Create the controller and refresh the cart from its draft order.
    #[must_use]
    pub fn new(cart: Arc<CartManager>) -> Self {
        let controller = Self {
            cart,
            scope: TaskScope::new(),
            notice: notice_channel(),
        };
        controller.refresh();
        controller
    }

    /// Observe the cart lines.
    #[must_use]
    pub fn lines(&self) -> watch::Receiver<Arc<[LineItem]>> {
        self.cart.subscribe()
    }

    /// Observe the latest user-facing message.
    #[must_use]
    pub fn notice(&self) -> watch::Receiver<Option<String>> {
        self.notice.subscribe()
    }

    /// Re-fetch the cart, in the background.
    pub fn refresh(&self) {
        self.mutate(|cart| async move { cart.refresh().await });
    }

    /// One more unit of a variant.
    pub fn increase(&self, variant: VariantId) {
        self.mutate(move |cart| async move { cart.increase(variant).await });
    }

    /// One fewer unit; the line disappears below quantity 1.
    pub fn decrease(&self, variant: VariantId) {
        self.mutate(move |cart| async move { cart.decrease(variant).await });
    }

    /// Drop a line entirely.
    pub fn remove(&self, variant: VariantId) {
        self.mutate(move |cart| async move { cart.remove_item(variant).await });
    }

    /// Run one cart mutation in the background, reporting failures as a
    /// notice. Each tap spawns its own task; the manager serializes them.
    fn mutate<F, Fut>(&self, operation: F)
    where
        F: FnOnce(Arc<CartManager>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), crate::error::ClientError>> + Send + 'static,
    {
        let cart = Arc::clone(&self.cart);
        let notice = self.notice.clone();
        self.scope.spawn(async move {
            if let Err(err) = operation(cart).await {
                warn!(error = %err, "cart mutation failed");
                notice.send_replace(Some(err.user_message()));
            }
        });
    }
}
