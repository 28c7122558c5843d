//! Catalog reads as tri-state streams.

use std::sync::Arc;

use futures::Stream;

use clementine_core::{CollectionId, ProductId};

use crate::models::{Brand, Product};
use crate::remote::ProductsApi;
use crate::ui_state::{UiState, fetch_state};

/// Read operations behind the home, brand, and product screens.
///
/// Every method returns a lazy stream that yields `Loading` and then the
/// outcome; nothing happens until the controller polls it.
#[derive(Clone)]
pub struct ProductRepository {
    api: Arc<dyn ProductsApi>,
}

impl ProductRepository {
    /// Create a repository over any catalog adapter.
    #[must_use]
    pub fn new(api: Arc<dyn ProductsApi>) -> Self {
        Self { api }
    }

    /// All brands, for the home screen's brand rail.
    pub fn brands(&self) -> impl Stream<Item = UiState<Vec<Brand>>> + Send + 'static {
        let api = Arc::clone(&self.api);
        fetch_state(async move { api.brands().await })
    }

    /// Featured products for the home screen.
    pub fn featured_products(&self) -> impl Stream<Item = UiState<Vec<Product>>> + Send + 'static {
        let api = Arc::clone(&self.api);
        fetch_state(async move { api.featured_products().await })
    }

    /// Products of one brand.
    pub fn brand_products(
        &self,
        collection: CollectionId,
    ) -> impl Stream<Item = UiState<Vec<Product>>> + Send + 'static {
        let api = Arc::clone(&self.api);
        fetch_state(async move { api.brand_products(collection).await })
    }

    /// Products of one brand, narrowed to a product type.
    pub fn brand_products_by_type(
        &self,
        collection: CollectionId,
        product_type: String,
    ) -> impl Stream<Item = UiState<Vec<Product>>> + Send + 'static {
        let api = Arc::clone(&self.api);
        fetch_state(async move { api.brand_products_by_type(collection, &product_type).await })
    }

    /// One product with variants and images.
    pub fn product(
        &self,
        id: ProductId,
    ) -> impl Stream<Item = UiState<Product>> + Send + 'static {
        let api = Arc::clone(&self.api);
        fetch_state(async move { api.product(id).await })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use futures::StreamExt;

    use crate::error::ClientError;

    use super::*;

    /// Catalog stub: succeeds with a fixed brand list, fails everything else.
    struct FixedCatalog;

    #[async_trait]
    impl ProductsApi for FixedCatalog {
        async fn brands(&self) -> Result<Vec<Brand>, ClientError> {
            Ok(vec![Brand {
                id: CollectionId::new(1),
                title: "ADIDAS".to_owned(),
                image: None,
            }])
        }

        async fn featured_products(&self) -> Result<Vec<Product>, ClientError> {
            Err(ClientError::Status {
                service: "admin",
                status: 500,
                body: String::new(),
            })
        }

        async fn brand_products(&self, _: CollectionId) -> Result<Vec<Product>, ClientError> {
            Ok(Vec::new())
        }

        async fn brand_products_by_type(
            &self,
            _: CollectionId,
            _: &str,
        ) -> Result<Vec<Product>, ClientError> {
            Ok(Vec::new())
        }

        async fn product(&self, _: ProductId) -> Result<Product, ClientError> {
            Err(ClientError::NotLoggedIn)
        }
    }

    #[tokio::test]
    async fn reads_emit_loading_then_success() {
        let repo = ProductRepository::new(Arc::new(FixedCatalog));
        let states: Vec<_> = repo.brands().collect().await;

        assert_eq!(states.len(), 2);
        assert!(states[0].is_loading());
        let brands = states[1].success().expect("success state");
        assert_eq!(brands[0].title, "ADIDAS");
    }

    #[tokio::test]
    async fn reads_emit_loading_then_error_on_failure() {
        let repo = ProductRepository::new(Arc::new(FixedCatalog));
        let states: Vec<_> = repo.featured_products().collect().await;

        assert_eq!(states.len(), 2);
        assert!(states[0].is_loading());
        assert!(states[1].error().is_some());
        assert!(states[1].success().is_none());
    }
}
