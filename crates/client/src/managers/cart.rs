//! The cart: an observable line collection backed by a remote draft order.
//!
//! Invariants:
//! - a line's quantity is always ≥ 1; decrementing at 1 removes the line
//! - adding a variant already in the cart merges into the existing line
//!   (one variant, one line), before the remote write
//! - an empty cart has no draft order: removing the last line deletes the
//!   remote resource and forgets its id
//!
//! After every successful mutation the collection is replaced from the
//! remote response - the platform's view of the lines, not the locally
//! predicted one - and published as a snapshot. The draft-order id is kept
//! in the preference store so a cart survives app restarts.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info};

use clementine_core::VariantId;

use crate::error::ClientError;
use crate::models::LineItem;
use crate::prefs::PreferenceStore;
use crate::remote::DraftOrdersApi;

/// Draft-order-backed cart manager.
pub struct CartManager {
    api: Arc<dyn DraftOrdersApi>,
    prefs: Arc<PreferenceStore>,
    /// Source of truth. Held across the remote call: one in-flight
    /// mutation at a time.
    lines: Mutex<Vec<LineItem>>,
    snapshot: watch::Sender<Arc<[LineItem]>>,
}

impl CartManager {
    /// Create a cart manager. The collection starts empty; call
    /// [`Self::refresh`] to hydrate it from a stored draft order.
    #[must_use]
    pub fn new(api: Arc<dyn DraftOrdersApi>, prefs: Arc<PreferenceStore>) -> Self {
        let (snapshot, _) = watch::channel(Arc::from(Vec::new()));
        Self {
            api,
            prefs,
            lines: Mutex::new(Vec::new()),
            snapshot,
        }
    }

    /// Subscribe to cart snapshots. The current value is observable
    /// immediately; every successful mutation publishes a new one.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<[LineItem]>> {
        self.snapshot.subscribe()
    }

    /// Whether a variant is in the cart.
    #[must_use]
    pub fn contains(&self, variant: VariantId) -> bool {
        self.snapshot
            .borrow()
            .iter()
            .any(|line| line.variant_id == variant)
    }

    /// Quantity of one variant, 0 if absent.
    #[must_use]
    pub fn quantity_of(&self, variant: VariantId) -> u32 {
        self.snapshot
            .borrow()
            .iter()
            .find(|line| line.variant_id == variant)
            .map_or(0, |line| line.quantity)
    }

    /// Number of lines in the cart.
    #[must_use]
    pub fn count(&self) -> usize {
        self.snapshot.borrow().len()
    }

    /// Sum of line totals, in the shop currency.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.snapshot.borrow().iter().map(LineItem::total).sum()
    }

    /// Re-fetch the cart from its stored draft order.
    ///
    /// A missing draft order (deleted out-of-band, or completed at
    /// checkout) resets the cart to empty rather than erroring.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or non-404 statuses.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        let mut lines = self.lines.lock().await;
        let Some(id) = self.prefs.cart_draft_order_id() else {
            self.publish(&mut lines, Vec::new());
            return Ok(());
        };

        match self.api.fetch(id).await {
            Ok(draft) => {
                self.publish(&mut lines, draft.line_items);
                Ok(())
            }
            Err(ClientError::Status { status: 404, .. }) => {
                debug!(%id, "stored draft order is gone, resetting cart");
                self.prefs.clear_cart_draft_order_id()?;
                self.publish(&mut lines, Vec::new());
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Add one unit of a variant. Merges into an existing line.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote write fails; the collection is left
    /// unchanged in that case.
    pub async fn add_item(&self, variant: VariantId) -> Result<(), ClientError> {
        let mut lines = self.lines.lock().await;
        let mut next = lines.clone();
        match next.iter_mut().find(|line| line.variant_id == variant) {
            Some(line) => line.quantity += 1,
            None => next.push(LineItem::one(variant)),
        }
        self.write_and_publish(&mut lines, next).await
    }

    /// Increase a line's quantity by one. Same merge rule as
    /// [`Self::add_item`].
    ///
    /// # Errors
    ///
    /// Returns an error if the remote write fails.
    pub async fn increase(&self, variant: VariantId) -> Result<(), ClientError> {
        self.add_item(variant).await
    }

    /// Decrease a line's quantity by one; at quantity 1 the line is
    /// removed. Absent variants are a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote write fails.
    pub async fn decrease(&self, variant: VariantId) -> Result<(), ClientError> {
        let mut lines = self.lines.lock().await;
        let mut next = lines.clone();
        let Some(position) = next.iter().position(|line| line.variant_id == variant) else {
            return Ok(());
        };
        if let Some(line) = next.get_mut(position) {
            if line.quantity > 1 {
                line.quantity -= 1;
            } else {
                next.remove(position);
            }
        }
        self.write_and_publish(&mut lines, next).await
    }

    /// Remove a line entirely, whatever its quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote write fails.
    pub async fn remove_item(&self, variant: VariantId) -> Result<(), ClientError> {
        let mut lines = self.lines.lock().await;
        let mut next = lines.clone();
        next.retain(|line| line.variant_id != variant);
        if next.len() == lines.len() {
            return Ok(());
        }
        self.write_and_publish(&mut lines, next).await
    }

    /// Empty the cart, deleting the backing draft order.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote delete fails.
    pub async fn clear(&self) -> Result<(), ClientError> {
        let mut lines = self.lines.lock().await;
        self.write_and_publish(&mut lines, Vec::new()).await
    }

    /// The current lines, cloned out of the latest snapshot.
    #[must_use]
    pub fn line_items(&self) -> Vec<LineItem> {
        self.snapshot.borrow().to_vec()
    }

    /// Write the next line set to the draft order, then replace the
    /// collection from the remote response and publish.
    async fn write_and_publish(
        &self,
        lines: &mut Vec<LineItem>,
        next: Vec<LineItem>,
    ) -> Result<(), ClientError> {
        let remote_lines = if next.is_empty() {
            if let Some(id) = self.prefs.cart_draft_order_id() {
                self.api.delete(id).await?;
                self.prefs.clear_cart_draft_order_id()?;
                info!(%id, "cart emptied, draft order deleted");
            }
            Vec::new()
        } else if let Some(id) = self.prefs.cart_draft_order_id() {
            self.api.set_line_items(id, next).await?.line_items
        } else {
            let draft = self.api.create(next).await?;
            self.prefs.set_cart_draft_order_id(draft.id)?;
            info!(id = %draft.id, "draft order created for cart");
            draft.line_items
        };

        self.publish(lines, remote_lines);
        Ok(())
    }

    fn publish(&self, lines: &mut Vec<LineItem>, next: Vec<LineItem>) {
        *lines = next.clone();
        self.snapshot.send_replace(Arc::from(next));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicI64, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Mutex as AsyncMutex;

    use clementine_core::{DraftOrderId, DraftOrderStatus};

    use crate::models::DraftOrder;

    use super::*;

    /// In-memory draft-order store mirroring the platform's behavior.
    #[derive(Default)]
    struct InMemoryDraftOrders {
        drafts: AsyncMutex<std::collections::HashMap<i64, Vec<LineItem>>>,
        next_id: AtomicI64,
    }

    impl InMemoryDraftOrders {
        fn draft(id: DraftOrderId, line_items: Vec<LineItem>) -> DraftOrder {
            DraftOrder {
                id,
                status: DraftOrderStatus::Open,
                line_items,
                currency: Some("USD".to_owned()),
                total_price: None,
            }
        }
    }

    #[async_trait]
    impl DraftOrdersApi for InMemoryDraftOrders {
        async fn create(&self, line_items: Vec<LineItem>) -> Result<DraftOrder, ClientError> {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            self.drafts.lock().await.insert(id, line_items.clone());
            Ok(Self::draft(DraftOrderId::new(id), line_items))
        }

        async fn fetch(&self, id: DraftOrderId) -> Result<DraftOrder, ClientError> {
            self.drafts.lock().await.get(&id.as_i64()).map_or_else(
                || {
                    Err(ClientError::Status {
                        service: "admin",
                        status: 404,
                        body: String::new(),
                    })
                },
                |lines| Ok(Self::draft(id, lines.clone())),
            )
        }

        async fn set_line_items(
            &self,
            id: DraftOrderId,
            line_items: Vec<LineItem>,
        ) -> Result<DraftOrder, ClientError> {
            self.drafts.lock().await.insert(id.as_i64(), line_items.clone());
            Ok(Self::draft(id, line_items))
        }

        async fn delete(&self, id: DraftOrderId) -> Result<(), ClientError> {
            self.drafts.lock().await.remove(&id.as_i64());
            Ok(())
        }
    }

    fn manager() -> CartManager {
        let path = std::env::temp_dir().join(format!("clementine-cart-{}.json", uuid::Uuid::new_v4()));
        CartManager::new(
            Arc::new(InMemoryDraftOrders::default()),
            Arc::new(PreferenceStore::open(path).unwrap()),
        )
    }

    #[tokio::test]
    async fn duplicate_add_merges_into_one_line() {
        let cart = manager();
        cart.add_item(VariantId::new(7)).await.unwrap();
        cart.add_item(VariantId::new(7)).await.unwrap();

        assert_eq!(cart.count(), 1);
        assert_eq!(cart.quantity_of(VariantId::new(7)), 2);
    }

    #[tokio::test]
    async fn decrease_below_one_removes_the_line() {
        let cart = manager();
        cart.add_item(VariantId::new(7)).await.unwrap();
        cart.add_item(VariantId::new(8)).await.unwrap();

        cart.decrease(VariantId::new(7)).await.unwrap();
        assert!(!cart.contains(VariantId::new(7)));
        assert_eq!(cart.quantity_of(VariantId::new(7)), 0);
        assert_eq!(cart.count(), 1);
    }

    #[tokio::test]
    async fn emptying_the_cart_deletes_the_draft_order() {
        let cart = manager();
        cart.add_item(VariantId::new(7)).await.unwrap();
        assert!(cart.prefs.cart_draft_order_id().is_some());

        cart.remove_item(VariantId::new(7)).await.unwrap();
        assert_eq!(cart.count(), 0);
        assert!(cart.prefs.cart_draft_order_id().is_none());
    }

    #[tokio::test]
    async fn snapshots_reach_subscribers_after_each_mutation() {
        let cart = manager();
        let mut rx = cart.subscribe();
        assert!(rx.borrow_and_update().is_empty());

        cart.add_item(VariantId::new(5)).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);
    }

    #[tokio::test]
    async fn overlapping_mutations_serialize() {
        let cart = Arc::new(manager());
        let mut tasks = Vec::new();
        for _ in 0..5 {
            let cart = Arc::clone(&cart);
            tasks.push(tokio::spawn(async move {
                cart.add_item(VariantId::new(9)).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }
        assert_eq!(cart.quantity_of(VariantId::new(9)), 5);
        assert_eq!(cart.count(), 1);
    }

    #[tokio::test]
    async fn refresh_resets_when_the_draft_order_is_gone() {
        let api = Arc::new(InMemoryDraftOrders::default());
        let path = std::env::temp_dir().join(format!("clementine-cart-{}.json", uuid::Uuid::new_v4()));
        let prefs = Arc::new(PreferenceStore::open(path).unwrap());
        prefs.set_cart_draft_order_id(DraftOrderId::new(999)).unwrap();

        let cart = CartManager::new(api, Arc::clone(&prefs));
        cart.refresh().await.unwrap();
        assert_eq!(cart.count(), 0);
        assert!(prefs.cart_draft_order_id().is_none());
    }
}
