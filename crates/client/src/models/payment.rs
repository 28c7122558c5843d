//! Payment-processor objects: customer, ephemeral key, payment intent.
//!
//! Only the fields the payment sheet needs to resume are modeled; everything
//! else the processor returns is ignored on deserialization.

use serde::Deserialize;

/// A payment-processor customer record (`cus_...`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentCustomer {
    pub id: String,
}

/// A short-lived credential scoped to one customer, authorizing client-side
/// payment operations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EphemeralKey {
    pub id: String,
    pub secret: String,
}

/// A payment intent: one attempt to collect an amount.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    /// The secret the payment sheet is initialized with.
    pub client_secret: String,
    /// Amount in the currency's minor unit (cents).
    pub amount: i64,
    pub currency: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_processor_responses_ignoring_extras() {
        let customer: PaymentCustomer =
            serde_json::from_str(r#"{"id": "cus_9s6XKzkNRiz8i3", "object": "customer", "livemode": false}"#)
                .expect("valid customer");
        assert_eq!(customer.id, "cus_9s6XKzkNRiz8i3");

        let intent: PaymentIntent = serde_json::from_str(
            r#"{"id": "pi_3MtwBw", "client_secret": "pi_3MtwBw_secret_x",
                "amount": 2999, "currency": "usd", "status": "requires_payment_method"}"#,
        )
        .expect("valid intent");
        assert_eq!(intent.amount, 2999);
    }
}
