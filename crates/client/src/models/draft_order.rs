//! Draft orders: the remote backing store for the cart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use clementine_core::{DraftOrderId, DraftOrderStatus, ProductId, VariantId};

/// One line of a draft order: a variant and how many of it.
///
/// Quantity is at least 1 by construction; a line that would drop to 0 is
/// removed instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub variant_id: VariantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub title: String,
    /// Unit price, serialized as a decimal string.
    #[serde(default, with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub quantity: u32,
}

impl LineItem {
    /// A single unit of a variant.
    #[must_use]
    pub fn one(variant_id: VariantId) -> Self {
        Self {
            variant_id,
            product_id: None,
            title: String::new(),
            price: Decimal::ZERO,
            quantity: 1,
        }
    }

    /// Line total: unit price times quantity.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// A draft order as the admin API returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftOrder {
    pub id: DraftOrderId,
    #[serde(default)]
    pub status: DraftOrderStatus,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "decimal_opt_str")]
    pub total_price: Option<Decimal>,
}

/// `{"draft_order": {...}}` single-resource envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftOrderEnvelope {
    pub draft_order: DraftOrder,
}

/// Request body for creating a draft order or replacing its lines.
#[derive(Debug, Clone, Serialize)]
pub struct NewDraftOrderEnvelope {
    pub draft_order: DraftOrderLines,
}

/// The writable part of a draft order: its line items.
#[derive(Debug, Clone, Serialize)]
pub struct DraftOrderLines {
    pub line_items: Vec<LineItem>,
}

impl NewDraftOrderEnvelope {
    /// Wrap a line set for the wire.
    #[must_use]
    pub fn new(line_items: Vec<LineItem>) -> Self {
        Self {
            draft_order: DraftOrderLines { line_items },
        }
    }
}

/// Serde helper: optional decimal serialized as a string.
mod decimal_opt_str {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Decimal>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_str(&d.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Decimal>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| s.parse().map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_draft_order_json() {
        let json = r#"{
            "draft_order": {
                "id": 994118539,
                "status": "open",
                "currency": "USD",
                "total_price": "59.98",
                "line_items": [
                    {"variant_id": 447654529, "product_id": 921728736,
                     "title": "Crewneck", "price": "29.99", "quantity": 2}
                ]
            }
        }"#;
        let envelope: DraftOrderEnvelope = serde_json::from_str(json).expect("valid draft order");
        let draft = envelope.draft_order;
        assert_eq!(draft.id, DraftOrderId::new(994_118_539));
        assert_eq!(draft.status, DraftOrderStatus::Open);
        assert_eq!(draft.total_price, Some(Decimal::new(5998, 2)));
        assert_eq!(draft.line_items[0].total(), Decimal::new(5998, 2));
    }

    #[test]
    fn line_items_serialize_for_the_admin_api() {
        let body = NewDraftOrderEnvelope::new(vec![LineItem::one(VariantId::new(7))]);
        let json = serde_json::to_value(&body).expect("json");
        assert_eq!(json["draft_order"]["line_items"][0]["variant_id"], 7);
        assert_eq!(json["draft_order"]["line_items"][0]["quantity"], 1);
        // price rides along as a string, the way the platform expects
        assert_eq!(json["draft_order"]["line_items"][0]["price"], "0");
    }
}
