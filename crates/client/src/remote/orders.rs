//! Order submission and history.

use async_trait::async_trait;
use tracing::instrument;

use clementine_core::CustomerId;

use super::AdminClient;
use crate::error::ClientError;
use crate::models::{NewOrder, NewOrderEnvelope, Order, OrderEnvelope, OrdersEnvelope};

/// Order operations against the platform.
#[async_trait]
pub trait OrdersApi: Send + Sync {
    /// Create an order (checkout submission).
    async fn create(&self, order: NewOrder) -> Result<Order, ClientError>;

    /// All orders placed by one customer.
    async fn for_customer(&self, customer: CustomerId) -> Result<Vec<Order>, ClientError>;
}

/// Admin-API-backed [`OrdersApi`].
#[derive(Clone)]
pub struct OrderRemote {
    admin: AdminClient,
}

impl OrderRemote {
    /// Create a new order adapter on top of the shared admin client.
    #[must_use]
    pub const fn new(admin: AdminClient) -> Self {
        Self { admin }
    }
}

#[async_trait]
impl OrdersApi for OrderRemote {
    #[instrument(skip(self, order))]
    async fn create(&self, order: NewOrder) -> Result<Order, ClientError> {
        let envelope: OrderEnvelope = self
            .admin
            .post("orders.json", &NewOrderEnvelope { order })
            .await?;
        Ok(envelope.order)
    }

    #[instrument(skip(self), fields(customer = %customer))]
    async fn for_customer(&self, customer: CustomerId) -> Result<Vec<Order>, ClientError> {
        let envelope: OrdersEnvelope = self
            .admin
            .get(&format!("orders.json?customer_id={customer}&status=any"))
            .await?;
        Ok(envelope.orders)
    }
}
