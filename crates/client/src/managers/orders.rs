//! Order history and order placement.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::{info, instrument};

use clementine_core::CustomerId;

use crate::error::ClientError;
use crate::models::{LineItem, NewOrder, Order};
use crate::prefs::PreferenceStore;
use crate::remote::OrdersApi;

/// Observable order history for the logged-in customer.
pub struct OrdersManager {
    api: Arc<dyn OrdersApi>,
    prefs: Arc<PreferenceStore>,
    /// Serializes mutations across the remote call.
    guard: Mutex<()>,
    snapshot: watch::Sender<Arc<[Order]>>,
}

impl OrdersManager {
    /// Create an orders manager. The history starts empty; call
    /// [`Self::refresh`] after login.
    #[must_use]
    pub fn new(api: Arc<dyn OrdersApi>, prefs: Arc<PreferenceStore>) -> Self {
        let (snapshot, _) = watch::channel(Arc::from(Vec::new()));
        Self {
            api,
            prefs,
            guard: Mutex::new(()),
            snapshot,
        }
    }

    /// Subscribe to order-history snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<[Order]>> {
        self.snapshot.subscribe()
    }

    /// The current history, cloned out of the latest snapshot.
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.snapshot.borrow().to_vec()
    }

    /// Re-fetch the order history from the platform.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotLoggedIn`] without a session, or any
    /// remote failure.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<(), ClientError> {
        let _mutation = self.guard.lock().await;
        let customer = self.customer_id()?;
        let orders = self.api.for_customer(customer).await?;
        self.snapshot.send_replace(Arc::from(orders));
        Ok(())
    }

    /// Submit an order for the given lines and prepend it to the history.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotLoggedIn`] without a session, or any
    /// remote failure.
    #[instrument(skip(self, line_items))]
    pub async fn place_order(&self, line_items: Vec<LineItem>) -> Result<Order, ClientError> {
        let _mutation = self.guard.lock().await;
        let customer = self.customer_id()?;
        let order = self.api.create(NewOrder::paid(customer, line_items)).await?;
        info!(id = %order.id, "order placed");

        let mut orders = self.snapshot.borrow().to_vec();
        orders.insert(0, order.clone());
        self.snapshot.send_replace(Arc::from(orders));
        Ok(order)
    }

    fn customer_id(&self) -> Result<CustomerId, ClientError> {
        self.prefs
            .session()
            .map(|session| session.customer_id)
            .ok_or(ClientError::NotLoggedIn)
    }
}
