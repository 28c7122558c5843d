//! Draft-order CRUD: the cart's remote backing resource.

use async_trait::async_trait;
use tracing::instrument;

use clementine_core::DraftOrderId;

use super::AdminClient;
use crate::error::ClientError;
use crate::models::{DraftOrder, DraftOrderEnvelope, LineItem, NewDraftOrderEnvelope};

/// Draft-order operations against the platform.
///
/// The cart manager is the only caller; it serializes its mutations, so this
/// adapter stays a plain pass-through.
#[async_trait]
pub trait DraftOrdersApi: Send + Sync {
    /// Create a draft order holding the given lines.
    async fn create(&self, line_items: Vec<LineItem>) -> Result<DraftOrder, ClientError>;

    /// Fetch a draft order by id.
    async fn fetch(&self, id: DraftOrderId) -> Result<DraftOrder, ClientError>;

    /// Replace a draft order's lines wholesale.
    async fn set_line_items(
        &self,
        id: DraftOrderId,
        line_items: Vec<LineItem>,
    ) -> Result<DraftOrder, ClientError>;

    /// Delete a draft order.
    async fn delete(&self, id: DraftOrderId) -> Result<(), ClientError>;
}

/// Admin-API-backed [`DraftOrdersApi`].
#[derive(Clone)]
pub struct DraftOrderRemote {
    admin: AdminClient,
}

impl DraftOrderRemote {
    /// Create a new draft-order adapter on top of the shared admin client.
    #[must_use]
    pub const fn new(admin: AdminClient) -> Self {
        Self { admin }
    }
}

#[async_trait]
impl DraftOrdersApi for DraftOrderRemote {
    #[instrument(skip(self, line_items))]
    async fn create(&self, line_items: Vec<LineItem>) -> Result<DraftOrder, ClientError> {
        let envelope: DraftOrderEnvelope = self
            .admin
            .post("draft_orders.json", &NewDraftOrderEnvelope::new(line_items))
            .await?;
        Ok(envelope.draft_order)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn fetch(&self, id: DraftOrderId) -> Result<DraftOrder, ClientError> {
        let envelope: DraftOrderEnvelope =
            self.admin.get(&format!("draft_orders/{id}.json")).await?;
        Ok(envelope.draft_order)
    }

    #[instrument(skip(self, line_items), fields(id = %id))]
    async fn set_line_items(
        &self,
        id: DraftOrderId,
        line_items: Vec<LineItem>,
    ) -> Result<DraftOrder, ClientError> {
        let envelope: DraftOrderEnvelope = self
            .admin
            .put(
                &format!("draft_orders/{id}.json"),
                &NewDraftOrderEnvelope::new(line_items),
            )
            .await?;
        Ok(envelope.draft_order)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: DraftOrderId) -> Result<(), ClientError> {
        self.admin.delete(&format!("draft_orders/{id}.json")).await
    }
}
