//! Wishlist screen.

use std::sync::Arc;

use tokio::sync::watch;

use clementine_core::VariantId;

use crate::managers::WishlistManager;

/// State holder for the wishlist screen. Purely local, so there is no
/// loading state and nothing to abort.
pub struct WishlistController {
    wishlist: Arc<WishlistManager>,
}

impl WishlistController {
    /// Create the controller.
    #[must_use]
    pub const fn new(wishlist: Arc<WishlistManager>) -> Self {
        Self { wishlist }
    }

    /// Observe the saved variants.
    #[must_use]
    pub fn items(&self) -> watch::Receiver<Arc<[VariantId]>> {
        self.wishlist.subscribe()
    }

    /// Remove a variant.
    pub fn remove(&self, variant: VariantId) {
        self.wishlist.remove(variant);
    }

    /// Whether a variant is saved.
    #[must_use]
    pub fn contains(&self, variant: VariantId) -> bool {
        self.wishlist.contains(variant)
    }
}
