//! Home screen: brand rail, featured products, quick cart/wishlist actions.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::warn;

use clementine_core::VariantId;

use super::{TaskScope, drive, notice_channel};
use crate::managers::{CartManager, WishlistManager};
use crate::models::{Brand, Product};
use crate::repositories::ProductRepository;
use crate::ui_state::UiState;

/// State holder for the home screen.
pub struct HomeController {
    products: ProductRepository,
    wishlist: Arc<WishlistManager>,
    cart: Arc<CartManager>,
    scope: TaskScope,
    brands: watch::Sender<UiState<Vec<Brand>>>,
    featured: watch::Sender<UiState<Vec<Product>>>,
    notice: watch::Sender<Option<String>>,
}

impl HomeController {
    /// Create the controller and start both catalog loads.
    #[must_use]
    pub fn new(
        products: ProductRepository,
        wishlist: Arc<WishlistManager>,
        cart: Arc<CartManager>,
    ) -> Self {
        let (brands, _) = watch::channel(UiState::Loading);
        let (featured, _) = watch::channel(UiState::Loading);
        let controller = Self {
            products,
            wishlist,
            cart,
            scope: TaskScope::new(),
            brands,
            featured,
            notice: notice_channel(),
        };
        controller.load_brands();
        controller.load_featured();
        controller
    }

    /// Observe the brand rail.
    #[must_use]
    pub fn brands(&self) -> watch::Receiver<UiState<Vec<Brand>>> {
        self.brands.subscribe()
    }

    /// Observe the featured products.
    #[must_use]
    pub fn featured(&self) -> watch::Receiver<UiState<Vec<Product>>> {
        self.featured.subscribe()
    }

    /// Observe the latest user-facing message.
    #[must_use]
    pub fn notice(&self) -> watch::Receiver<Option<String>> {
        self.notice.subscribe()
    }

    /// (Re-)load the brand rail.
    pub fn load_brands(&self) {
        drive(&self.scope, self.brands.clone(), self.products.brands());
    }

    /// (Re-)load the featured products.
    pub fn load_featured(&self) {
        drive(
            &self.scope,
            self.featured.clone(),
            self.products.featured_products(),
        );
    }

    /// Save a variant to the wishlist.
    pub fn add_to_wishlist(&self, variant: VariantId) {
        self.wishlist.add(variant);
    }

    /// Remove a variant from the wishlist.
    pub fn remove_from_wishlist(&self, variant: VariantId) {
        self.wishlist.remove(variant);
    }

    /// Whether a variant is on the wishlist.
    #[must_use]
    pub fn is_favorite(&self, variant: VariantId) -> bool {
        self.wishlist.contains(variant)
    }

    /// Add one unit of a variant to the cart, in the background.
    pub fn add_to_cart(&self, variant: VariantId) {
        let cart = Arc::clone(&self.cart);
        let notice = self.notice.clone();
        self.scope.spawn(async move {
            if let Err(err) = cart.add_item(variant).await {
                warn!(error = %err, "adding to cart failed");
                notice.send_replace(Some(err.user_message()));
            }
        });
    }
}
