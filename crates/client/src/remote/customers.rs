//! Platform customer and address operations.

use async_trait::async_trait;
use tracing::instrument;

use clementine_core::{AddressId, CustomerId};

use super::AdminClient;
use crate::error::ClientError;
use crate::models::address::NewAddressEnvelope;
use crate::models::{
    Address, AddressEnvelope, AddressesEnvelope, Customer, CustomerDraft, CustomerEnvelope,
    CustomersEnvelope, NewAddress, NewCustomerEnvelope,
};

/// Customer record and address CRUD against the platform.
#[async_trait]
pub trait CustomersApi: Send + Sync {
    /// Fetch one customer by id.
    async fn customer(&self, id: CustomerId) -> Result<Customer, ClientError>;

    /// Look a customer up by email, if one exists.
    async fn customer_by_email(&self, email: &str) -> Result<Option<Customer>, ClientError>;

    /// Create a platform customer. The draft's password fields are
    /// write-only; the returned record never carries them.
    async fn create_customer(&self, draft: CustomerDraft) -> Result<Customer, ClientError>;

    /// All addresses on a customer record.
    async fn addresses(&self, customer: CustomerId) -> Result<Vec<Address>, ClientError>;

    /// Add an address to a customer record.
    async fn create_address(
        &self,
        customer: CustomerId,
        address: NewAddress,
    ) -> Result<Address, ClientError>;

    /// Replace the fields of an existing address.
    async fn update_address(
        &self,
        customer: CustomerId,
        address_id: AddressId,
        address: NewAddress,
    ) -> Result<Address, ClientError>;

    /// Delete an address from a customer record.
    async fn delete_address(
        &self,
        customer: CustomerId,
        address_id: AddressId,
    ) -> Result<(), ClientError>;
}

/// Admin-API-backed [`CustomersApi`].
#[derive(Clone)]
pub struct CustomerRemote {
    admin: AdminClient,
}

impl CustomerRemote {
    /// Create a new customer adapter on top of the shared admin client.
    #[must_use]
    pub const fn new(admin: AdminClient) -> Self {
        Self { admin }
    }
}

#[async_trait]
impl CustomersApi for CustomerRemote {
    #[instrument(skip(self), fields(id = %id))]
    async fn customer(&self, id: CustomerId) -> Result<Customer, ClientError> {
        let envelope: CustomerEnvelope = self.admin.get(&format!("customers/{id}.json")).await?;
        Ok(envelope.customer)
    }

    #[instrument(skip(self, email))]
    async fn customer_by_email(&self, email: &str) -> Result<Option<Customer>, ClientError> {
        let envelope: CustomersEnvelope = self
            .admin
            .get(&format!("customers/search.json?query=email:{email}"))
            .await?;
        Ok(envelope.customers.into_iter().next())
    }

    #[instrument(skip(self, draft))]
    async fn create_customer(&self, draft: CustomerDraft) -> Result<Customer, ClientError> {
        let envelope: CustomerEnvelope = self
            .admin
            .post("customers.json", &NewCustomerEnvelope { customer: draft })
            .await?;
        Ok(envelope.customer)
    }

    #[instrument(skip(self), fields(customer = %customer))]
    async fn addresses(&self, customer: CustomerId) -> Result<Vec<Address>, ClientError> {
        let envelope: AddressesEnvelope = self
            .admin
            .get(&format!("customers/{customer}/addresses.json"))
            .await?;
        Ok(envelope.addresses)
    }

    #[instrument(skip(self, address), fields(customer = %customer))]
    async fn create_address(
        &self,
        customer: CustomerId,
        address: NewAddress,
    ) -> Result<Address, ClientError> {
        let envelope: AddressEnvelope = self
            .admin
            .post(
                &format!("customers/{customer}/addresses.json"),
                &NewAddressEnvelope { address },
            )
            .await?;
        Ok(envelope.customer_address)
    }

    #[instrument(skip(self, address), fields(customer = %customer, address_id = %address_id))]
    async fn update_address(
        &self,
        customer: CustomerId,
        address_id: AddressId,
        address: NewAddress,
    ) -> Result<Address, ClientError> {
        let envelope: AddressEnvelope = self
            .admin
            .put(
                &format!("customers/{customer}/addresses/{address_id}.json"),
                &NewAddressEnvelope { address },
            )
            .await?;
        Ok(envelope.customer_address)
    }

    #[instrument(skip(self), fields(customer = %customer, address_id = %address_id))]
    async fn delete_address(
        &self,
        customer: CustomerId,
        address_id: AddressId,
    ) -> Result<(), ClientError> {
        self.admin
            .delete(&format!("customers/{customer}/addresses/{address_id}.json"))
            .await
    }
}
