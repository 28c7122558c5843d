//! Brand screen: one brand's products, with an optional type filter.

use tokio::sync::watch;

use clementine_core::CollectionId;

use super::{TaskScope, drive};
use crate::models::Product;
use crate::repositories::ProductRepository;
use crate::ui_state::UiState;

/// State holder for a single brand's product grid.
pub struct BrandController {
    products: ProductRepository,
    collection: CollectionId,
    scope: TaskScope,
    state: watch::Sender<UiState<Vec<Product>>>,
}

impl BrandController {
    /// Create the controller for one brand and start the unfiltered load.
    #[must_use]
    pub fn new(products: ProductRepository, collection: CollectionId) -> Self {
        let (state, _) = watch::channel(UiState::Loading);
        let controller = Self {
            products,
            collection,
            scope: TaskScope::new(),
            state,
        };
        controller.load();
        controller
    }

    /// Observe the product grid.
    #[must_use]
    pub fn products(&self) -> watch::Receiver<UiState<Vec<Product>>> {
        self.state.subscribe()
    }

    /// (Re-)load all of the brand's products.
    pub fn load(&self) {
        drive(
            &self.scope,
            self.state.clone(),
            self.products.brand_products(self.collection),
        );
    }

    /// Narrow the grid to one product type (shoes, shirts, ...).
    pub fn filter_by_type(&self, product_type: impl Into<String>) {
        drive(
            &self.scope,
            self.state.clone(),
            self.products
                .brand_products_by_type(self.collection, product_type.into()),
        );
    }
}
