//! Customer addresses.
//!
//! Free-text fields; the platform does not validate beyond requiring a
//! country, and neither does this client. Required-field checks belong to
//! the screens that collect the input.

use serde::{Deserialize, Serialize};

use clementine_core::{AddressId, CustomerId};

/// An address on a customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub customer_id: CustomerId,
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Whether this is the customer's default shipping address.
    #[serde(default)]
    pub default: bool,
}

/// An address to be created.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// `{"customer_address": {...}}` single-resource envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressEnvelope {
    pub customer_address: Address,
}

/// `{"addresses": [...]}` list envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressesEnvelope {
    pub addresses: Vec<Address>,
}

/// Request envelope for address creation and update.
#[derive(Debug, Clone, Serialize)]
pub struct NewAddressEnvelope {
    pub address: NewAddress,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_address_list() {
        let json = r#"{
            "addresses": [
                {"id": 1, "customer_id": 2, "address1": "1 Rue des Carrieres",
                 "city": "Montreal", "country": "Canada", "zip": "H2X 1X9", "default": true},
                {"id": 2, "customer_id": 2}
            ]
        }"#;
        let envelope: AddressesEnvelope = serde_json::from_str(json).expect("valid address JSON");
        assert_eq!(envelope.addresses.len(), 2);
        assert!(envelope.addresses[0].default);
        assert!(envelope.addresses[1].address1.is_none());
    }

    #[test]
    fn new_address_omits_empty_fields() {
        let json = serde_json::to_string(&NewAddress {
            city: Some("Cairo".to_owned()),
            ..NewAddress::default()
        })
        .expect("json");
        assert_eq!(json, r#"{"city":"Cairo"}"#);
    }
}
