//! Status enums for platform order resources.

use serde::{Deserialize, Serialize};

/// Lifecycle of a draft order (the cart's remote backing resource).
///
/// Matches the admin REST API's lowercase values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DraftOrderStatus {
    /// Still being edited; the state every cart lives in.
    #[default]
    Open,
    /// Invoice sent to the customer.
    InvoiceSent,
    /// Converted into a real order.
    Completed,
}

/// Payment state of a placed order.
///
/// Matches the admin REST API's lowercase values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FinancialStatus {
    #[default]
    Pending,
    Authorized,
    Paid,
    PartiallyPaid,
    PartiallyRefunded,
    Refunded,
    Voided,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_use_platform_wire_names() {
        assert_eq!(
            serde_json::to_string(&DraftOrderStatus::InvoiceSent).unwrap(),
            "\"invoice_sent\""
        );
        assert_eq!(
            serde_json::from_str::<FinancialStatus>("\"partially_paid\"").unwrap(),
            FinancialStatus::PartiallyPaid
        );
    }
}
