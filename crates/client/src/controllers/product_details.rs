//! Product details screen: one product, wishlist and cart membership.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::warn;

use clementine_core::{ProductId, VariantId};

use super::{TaskScope, drive, notice_channel};
use crate::managers::{CartManager, WishlistManager};
use crate::models::Product;
use crate::repositories::ProductRepository;
use crate::ui_state::UiState;

/// State holder for one product's detail screen.
pub struct ProductDetailsController {
    products: ProductRepository,
    wishlist: Arc<WishlistManager>,
    cart: Arc<CartManager>,
    product_id: ProductId,
    scope: TaskScope,
    product: watch::Sender<UiState<Product>>,
    notice: watch::Sender<Option<String>>,
}

impl ProductDetailsController {
    /// Create the controller for one product and start loading it.
    #[must_use]
    pub fn new(
        products: ProductRepository,
        wishlist: Arc<WishlistManager>,
        cart: Arc<CartManager>,
        product_id: ProductId,
    ) -> Self {
        let (product, _) = watch::channel(UiState::Loading);
        let controller = Self {
            products,
            wishlist,
            cart,
            product_id,
            scope: TaskScope::new(),
            product,
            notice: notice_channel(),
        };
        controller.load();
        controller
    }

    /// Observe the product.
    #[must_use]
    pub fn product(&self) -> watch::Receiver<UiState<Product>> {
        self.product.subscribe()
    }

    /// Observe the latest user-facing message.
    #[must_use]
    pub fn notice(&self) -> watch::Receiver<Option<String>> {
        self.notice.subscribe()
    }

    /// (Re-)load the product.
    pub fn load(&self) {
        drive(
            &self.scope,
            self.product.clone(),
            self.products.product(self.product_id),
        );
    }

    /// Whether a variant is on the wishlist.
    #[must_use]
    pub fn is_favorite(&self, variant: VariantId) -> bool {
        self.wishlist.contains(variant)
    }

    /// Flip a variant's wishlist membership.
    pub fn toggle_wishlist(&self, variant: VariantId) {
        if self.wishlist.contains(variant) {
            self.wishlist.remove(variant);
        } else {
            self.wishlist.add(variant);
        }
    }

    /// Quantity of a variant already in the cart.
    #[must_use]
    pub fn in_cart(&self, variant: VariantId) -> u32 {
        self.cart.quantity_of(variant)
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
