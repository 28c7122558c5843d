//! Placed orders: the checkout submission and order history shapes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use clementine_core::{CustomerId, FinancialStatus, OrderId};

use super::draft_order::LineItem;

/// An order as the admin API returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub financial_status: FinancialStatus,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// An order to be created at checkout.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub line_items: Vec<LineItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<OrderCustomerRef>,
    pub financial_status: FinancialStatus,
}

/// Reference linking an order to its customer.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct OrderCustomerRef {
    pub id: CustomerId,
}

impl NewOrder {
    /// An order for a logged-in customer, paid through the payment sheet.
    #[must_use]
    pub const fn paid(customer_id: CustomerId, line_items: Vec<LineItem>) -> Self {
        Self {
            line_items,
            customer: Some(OrderCustomerRef { id: customer_id }),
            financial_status: FinancialStatus::Paid,
        }
    }
}

/// `{"order": {...}}` single-resource envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEnvelope {
    pub order: Order,
}

/// `{"orders": [...]}` list envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersEnvelope {
    pub orders: Vec<Order>,
}

/// Request envelope for order creation.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrderEnvelope {
    pub order: NewOrder,
}

#[cfg(test)]
mod tests {
    use clementine_core::VariantId;

    use super::*;

    #[test]
    fn parses_order_history_json() {
        let json = r#"{
            "orders": [
                {"id": 450789469, "financial_status": "paid", "currency": "USD",
                 "total_price": "409.94", "created_at": "2024-01-02T08:59:11Z",
                 "line_items": [{"variant_id": 1, "title": "Boots", "price": "409.94", "quantity": 1}]}
            ]
        }"#;
        let envelope: OrdersEnvelope = serde_json::from_str(json).expect("valid orders JSON");
        assert_eq!(envelope.orders[0].financial_status, FinancialStatus::Paid);
        assert_eq!(envelope.orders[0].total_price, Decimal::new(40_994, 2));
    }

    #[test]
    fn new_order_carries_customer_reference() {
        let order = NewOrder::paid(CustomerId::new(123), vec![LineItem::one(VariantId::new(5))]);
        let json = serde_json::to_value(NewOrderEnvelope { order }).expect("json");
        assert_eq!(json["order"]["customer"]["id"], 123);
        assert_eq!(json["order"]["financial_status"], "paid");
    }
}
