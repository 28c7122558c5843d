//! Platform customer records.

use serde::{Deserialize, Serialize};

use clementine_core::CustomerId;

use super::address::Address;

/// A customer as the admin API returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub addresses: Vec<Address>,
}

/// A customer to be created. The password fields are write-only: the
/// platform accepts them at registration and never returns them. Federated
/// sign-ups create customers without a platform password.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerDraft {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_confirmation: Option<String>,
}

/// `{"customer": {...}}` single-resource envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerEnvelope {
    pub customer: Customer,
}

/// `{"customers": [...]}` list envelope (email search).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomersEnvelope {
    pub customers: Vec<Customer>,
}

/// Request envelope for customer creation.
#[derive(Debug, Clone, Serialize)]
pub struct NewCustomerEnvelope {
    pub customer: CustomerDraft,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_customer_with_addresses() {
        let json = r#"{
            "customer": {
                "id": 207119551,
                "email": "bob.norman@mail.example.com",
                "first_name": "Bob",
                "last_name": "Norman",
                "phone": "+16136120707",
                "addresses": [
                    {
                        "id": 207119551,
                        "customer_id": 207119551,
                        "address1": "Chestnut Street 92",
                        "city": "Louisville",
                        "country": "United States",
                        "zip": "40202",
                        "default": true
                    }
                ]
            }
        }"#;
        let envelope: CustomerEnvelope = serde_json::from_str(json).expect("valid customer JSON");
        assert_eq!(envelope.customer.id, CustomerId::new(207_119_551));
        assert_eq!(envelope.customer.addresses.len(), 1);
    }

    #[test]
    fn draft_serializes_password_but_customer_never_carries_one() {
        let draft = CustomerDraft {
            email: "a@b.com".to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "L".to_owned(),
            phone: None,
            password: Some("secret1".to_owned()),
            password_confirmation: Some("secret1".to_owned()),
        };
        let json = serde_json::to_string(&NewCustomerEnvelope { customer: draft }).expect("json");
        assert!(json.contains("password"));
        assert!(!json.contains("phone"));
    }
}
