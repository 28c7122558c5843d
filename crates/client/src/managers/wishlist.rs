//! The wishlist: a locally-tracked, idempotent set of variant ids.
//!
//! Unlike the cart there is no remote resource behind it; the set lives in
//! memory for the session. Insertion order is preserved so the screen shows
//! items in the order they were saved.

use std::sync::Arc;
use std::sync::Mutex;

use tokio::sync::watch;

use clementine_core::VariantId;

/// Observable wishlist set.
pub struct WishlistManager {
    /// Source of truth; ordered, no duplicates.
    ids: Mutex<Vec<VariantId>>,
    snapshot: watch::Sender<Arc<[VariantId]>>,
}

impl Default for WishlistManager {
    fn default() -> Self {
        Self::new()
    }
}

impl WishlistManager {
    /// Create an empty wishlist.
    #[must_use]
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::from(Vec::new()));
        Self {
            ids: Mutex::new(Vec::new()),
            snapshot,
        }
    }

    /// Subscribe to wishlist snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<[VariantId]>> {
        self.snapshot.subscribe()
    }

    /// Add a variant. Adding one already present has no effect.
    pub fn add(&self, variant: VariantId) {
        let mut ids = self.lock();
        if ids.contains(&variant) {
            return;
        }
        ids.push(variant);
        self.snapshot.send_replace(Arc::from(ids.clone()));
    }

    /// Remove a variant. Absent variants are a no-op.
    pub fn remove(&self, variant: VariantId) {
        let mut ids = self.lock();
        let before = ids.len();
        ids.retain(|id| *id != variant);
        if ids.len() != before {
            self.snapshot.send_replace(Arc::from(ids.clone()));
        }
    }

    /// Whether a variant is saved.
    #[must_use]
    pub fn contains(&self, variant: VariantId) -> bool {
        self.lock().contains(&variant)
    }

    /// Number of saved variants.
    #[must_use]
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<VariantId>> {
        self.ids.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
