//! Catalog reads: brands (smart collections) and products.
//!
//! Catalog resources are immutable from the client's point of view, so
//! responses are cached with `moka` (5-minute TTL). Mutable resources
//! (draft orders, customers) are never cached.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::{debug, instrument};

use clementine_core::{CollectionId, ProductId};

use super::AdminClient;
use crate::error::ClientError;
use crate::models::{Brand, Product, ProductEnvelope, ProductsEnvelope, SmartCollectionsEnvelope};

/// How many products a featured-products fetch asks for.
const FEATURED_LIMIT: u32 = 20;

/// Catalog operations against the platform.
#[async_trait]
pub trait ProductsApi: Send + Sync {
    /// All brands (smart collections).
    async fn brands(&self) -> Result<Vec<Brand>, ClientError>;

    /// A storefront-sized slice of the catalog for the home screen.
    async fn featured_products(&self) -> Result<Vec<Product>, ClientError>;

    /// All products in one brand's collection.
    async fn brand_products(&self, collection: CollectionId) -> Result<Vec<Product>, ClientError>;

    /// Products in one brand's collection, filtered by product type.
    async fn brand_products_by_type(
        &self,
        collection: CollectionId,
        product_type: &str,
    ) -> Result<Vec<Product>, ClientError>;

    /// One product with its variants and images.
    async fn product(&self, id: ProductId) -> Result<Product, ClientError>;
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Brands(Vec<Brand>),
    Products(Vec<Product>),
    Product(Box<Product>),
}

/// Admin-API-backed [`ProductsApi`] with a read-through cache.
#[derive(Clone)]
pub struct ProductRemote {
    admin: AdminClient,
    cache: Cache<String, CacheValue>,
}

impl ProductRemote {
    /// Create a new catalog adapter on top of the shared admin client.
    #[must_use]
    pub fn new(admin: AdminClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();
        Self { admin, cache }
    }
}

#[async_trait]
impl ProductsApi for ProductRemote {
    #[instrument(skip(self))]
    async fn brands(&self) -> Result<Vec<Brand>, ClientError> {
        let cache_key = "brands".to_owned();

        if let Some(CacheValue::Brands(brands)) = self.cache.get(&cache_key).await {
            debug!("Cache hit for brands");
            return Ok(brands);
        }

        let envelope: SmartCollectionsEnvelope = self.admin.get("smart_collections.json").await?;
        let brands = envelope.smart_collections;

        self.cache
            .insert(cache_key, CacheValue::Brands(brands.clone()))
            .await;

        Ok(brands)
    }

    #[instrument(skip(self))]
    async fn featured_products(&self) -> Result<Vec<Product>, ClientError> {
        let cache_key = "products:featured".to_owned();

        if let Some(CacheValue::Products(products)) = self.cache.get(&cache_key).await {
            debug!("Cache hit for featured products");
            return Ok(products);
        }

        let envelope: ProductsEnvelope = self
            .admin
            .get(&format!("products.json?limit={FEATURED_LIMIT}"))
            .await?;
        let products = envelope.products;

        self.cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    #[instrument(skip(self), fields(collection = %collection))]
    async fn brand_products(&self, collection: CollectionId) -> Result<Vec<Product>, ClientError> {
        let cache_key = format!("products:collection:{collection}");

        if let Some(CacheValue::Products(products)) = self.cache.get(&cache_key).await {
            debug!("Cache hit for brand products");
            return Ok(products);
        }

        let envelope: ProductsEnvelope = self
            .admin
            .get(&format!("products.json?collection_id={collection}"))
            .await?;
        let products = envelope.products;

        self.cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    #[instrument(skip(self), fields(collection = %collection, product_type = %product_type))]
    async fn brand_products_by_type(
        &self,
        collection: CollectionId,
        product_type: &str,
    ) -> Result<Vec<Product>, ClientError> {
        let cache_key = format!("products:collection:{collection}:type:{product_type}");

        if let Some(CacheValue::Products(products)) = self.cache.get(&cache_key).await {
            debug!("Cache hit for typed brand products");
            return Ok(products);
        }

        let envelope: ProductsEnvelope = self
            .admin
            .get(&format!(
                "products.json?collection_id={collection}&product_type={product_type}"
            ))
            .await?;
        let products = envelope.products;

        self.cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn product(&self, id: ProductId) -> Result<Product, ClientError> {
        let cache_key = format!("product:{id}");

        if let Some(CacheValue::Product(product)) = self.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let envelope: ProductEnvelope = self.admin.get(&format!("products/{id}.json")).await?;
        let product = envelope.product;

        self.cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }
}
