//! The logged-in customer's addresses as an observable collection.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::instrument;

use clementine_core::{AddressId, CustomerId};

use crate::error::ClientError;
use crate::models::{Address, NewAddress};
use crate::prefs::PreferenceStore;
use crate::remote::CustomersApi;

/// Observable address book. Every operation requires a stored session;
/// without one it fails with [`ClientError::NotLoggedIn`].
pub struct AddressManager {
    api: Arc<dyn CustomersApi>,
    prefs: Arc<PreferenceStore>,
    /// Serializes mutations across the remote call.
    guard: Mutex<()>,
    snapshot: watch::Sender<Arc<[Address]>>,
}

impl AddressManager {
    /// Create an address manager. The collection starts empty; call
    /// [`Self::refresh`] after login.
    #[must_use]
    pub fn new(api: Arc<dyn CustomersApi>, prefs: Arc<PreferenceStore>) -> Self {
        let (snapshot, _) = watch::channel(Arc::from(Vec::new()));
        Self {
            api,
            prefs,
            guard: Mutex::new(()),
            snapshot,
        }
    }

    /// Subscribe to address snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<[Address]>> {
        self.snapshot.subscribe()
    }

    /// The current addresses, cloned out of the latest snapshot.
    #[must_use]
    pub fn addresses(&self) -> Vec<Address> {
        self.snapshot.borrow().to_vec()
    }

    /// Re-fetch the address list from the platform.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotLoggedIn`] without a session, or any
    /// remote failure.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<(), ClientError> {
        let _mutation = self.guard.lock().await;
        let customer = self.customer_id()?;
        let addresses = self.api.addresses(customer).await?;
        self.snapshot.send_replace(Arc::from(addresses));
        Ok(())
    }

    /// Add an address, then republish the full list from the platform.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotLoggedIn`] without a session, or any
    /// remote failure.
    #[instrument(skip(self, address))]
    pub async fn add(&self, address: NewAddress) -> Result<(), ClientError> {
        let _mutation = self.guard.lock().await;
        let customer = self.customer_id()?;
        self.api.create_address(customer, address).await?;
        self.republish(customer).await
    }

    /// Update an address, then republish.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotLoggedIn`] without a session, or any
    /// remote failure.
    #[instrument(skip(self, address), fields(address_id = %address_id))]
    pub async fn update(
        &self,
        address_id: AddressId,
        address: NewAddress,
    ) -> Result<(), ClientError> {
        let _mutation = self.guard.lock().await;
        let customer = self.customer_id()?;
        self.api.update_address(customer, address_id, address).await?;
        self.republish(customer).await
    }

    /// Remove an address, then republish.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotLoggedIn`] without a session, or any
    /// remote failure.
    #[instrument(skip(self), fields(address_id = %address_id))]
    pub async fn remove(&self, address_id: AddressId) -> Result<(), ClientError> {
        let _mutation = self.guard.lock().await;
        let customer = self.customer_id()?;
        self.api.delete_address(customer, address_id).await?;
        self.republish(customer).await
    }

    async fn republish(&self, customer: CustomerId) -> Result<(), ClientError> {
        let addresses = self.api.addresses(customer).await?;
        self.snapshot.send_replace(Arc::from(addresses));
        Ok(())
    }

    fn customer_id(&self) -> Result<CustomerId, ClientError> {
        self.prefs
            .session()
            .map(|session| session.customer_id)
            .ok_or(ClientError::NotLoggedIn)
    }
}
