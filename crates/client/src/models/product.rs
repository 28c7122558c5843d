//! Catalog types: brands (smart collections), products, variants, images.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use clementine_core::{CollectionId, ProductId, VariantId};

/// A product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Source URL.
    pub src: String,
}

/// A brand: a smart collection grouping one vendor's products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: CollectionId,
    /// Display name.
    pub title: String,
    /// Representative image, if the collection has one.
    pub image: Option<Image>,
}

/// A specific purchasable configuration of a product (size/color), with its
/// own id, price, and stock count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub title: String,
    /// Price in the shop currency, serialized as a decimal string.
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    /// Units in stock.
    #[serde(default)]
    pub inventory_quantity: i64,
}

/// A top-level product together with its variants and images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub vendor: String,
    /// Used for in-brand type filtering (shoes, shirts, ...).
    #[serde(default)]
    pub product_type: String,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub images: Vec<Image>,
    /// The cover image, if any.
    #[serde(default)]
    pub image: Option<Image>,
}

impl Product {
    /// The variant the storefront quotes by default.
    #[must_use]
    pub fn first_variant(&self) -> Option<&Variant> {
        self.variants.first()
    }
}

/// `{"smart_collections": [...]}` list envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartCollectionsEnvelope {
    pub smart_collections: Vec<Brand>,
}

/// `{"products": [...]}` list envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductsEnvelope {
    pub products: Vec<Product>,
}

/// `{"product": {...}}` single-resource envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductEnvelope {
    pub product: Product,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_admin_product_json() {
        let json = r#"{
            "product": {
                "id": 632910392,
                "title": "IPod Nano - 8GB",
                "vendor": "Apple",
                "product_type": "Cult Products",
                "variants": [
                    {
                        "id": 808950810,
                        "product_id": 632910392,
                        "title": "Pink",
                        "price": "199.00",
                        "inventory_quantity": 10
                    }
                ],
                "images": [{"src": "https://cdn.example/ipod-nano.png"}],
                "image": {"src": "https://cdn.example/ipod-nano.png"}
            }
        }"#;

        let envelope: ProductEnvelope = serde_json::from_str(json).expect("valid product JSON");
        let product = envelope.product;
        assert_eq!(product.id, ProductId::new(632_910_392));
        let variant = product.first_variant().expect("one variant");
        assert_eq!(variant.price, Decimal::new(19_900, 2));
        assert_eq!(variant.inventory_quantity, 10);
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = r#"{"id": 1, "title": "Bare"}"#;
        let product: Product = serde_json::from_str(json).expect("minimal product");
        assert!(product.variants.is_empty());
        assert!(product.image.is_none());
        assert_eq!(product.product_type, "");
    }

    #[test]
    fn parses_smart_collections_list() {
        let json = r#"{
            "smart_collections": [
                {"id": 482865238, "title": "ADIDAS", "image": {"src": "https://cdn.example/a.png"}},
                {"id": 482865239, "title": "NIKE", "image": null}
            ]
        }"#;
        let envelope: SmartCollectionsEnvelope =
            serde_json::from_str(json).expect("valid collections JSON");
        assert_eq!(envelope.smart_collections.len(), 2);
        assert!(envelope.smart_collections[1].image.is_none());
    }
}
