//! Wire and domain types for the vendor APIs.
//!
//! The structs here mirror the JSON the vendor APIs actually speak: the
//! platform admin REST resources (products, collections, customers,
//! addresses, draft orders, orders), the payment processor's objects, and
//! the currency exchange response. Envelope structs (`{"product": {...}}`)
//! exist because the admin API wraps every resource in a named key.

pub mod address;
pub mod currency;
pub mod customer;
pub mod draft_order;
pub mod order;
pub mod payment;
pub mod product;

pub use address::{Address, AddressEnvelope, AddressesEnvelope, NewAddress};
pub use currency::ExchangeResult;
pub use customer::{
    Customer, CustomerDraft, CustomerEnvelope, CustomersEnvelope, NewCustomerEnvelope,
};
pub use draft_order::{DraftOrder, DraftOrderEnvelope, LineItem, NewDraftOrderEnvelope};
pub use order::{NewOrder, NewOrderEnvelope, Order, OrderEnvelope, OrdersEnvelope};
pub use payment::{EphemeralKey, PaymentCustomer, PaymentIntent};
pub use product::{
    Brand, Image, Product, ProductEnvelope, ProductsEnvelope, SmartCollectionsEnvelope, Variant,
};
