//! Address book screen.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::warn;

use clementine_core::AddressId;

use super::{TaskScope, notice_channel};
use crate::error::ClientError;
use crate::managers::AddressManager;
use crate::models::{Address, NewAddress};

/// State holder for the address book screen.
pub struct AddressesController {
    addresses: Arc<AddressManager>,
    scope: TaskScope,
    notice: watch::Sender<Option<String>>,
}

impl AddressesController {
    /// Create the controller and refresh the list.
    #[must_use]
    pub fn new(addresses: Arc<AddressManager>) -> Self {
        let controller = Self {
            addresses,
            scope: TaskScope::new(),
            notice: notice_channel(),
        };
        controller.refresh();
        controller
    }

    /// Observe the address list.
    #[must_use]
    pub fn addresses(&self) -> watch::Receiver<Arc<[Address]>> {
        self.addresses.subscribe()
    }

    /// Observe the latest user-facing message.
    #[must_use]
    pub fn notice(&self) -> watch::Receiver<Option<String>> {
        self.notice.subscribe()
    }

    /// Re-fetch the address list, in the background.
    pub fn refresh(&self) {
        self.mutate(|addresses| async move { addresses.refresh().await });
    }

    /// Add an address.
    pub fn add(&self, address: NewAddress) {
        self.mutate(move |addresses| async move { addresses.add(address).await });
    }

    /// Update an address.
    pub fn update(&self, id: AddressId, address: NewAddress) {
        self.mutate(move |addresses| async move { addresses.update(id, address).await });
    }

    /// Remove an address.
    pub fn remove(&self, id: AddressId) {
        self.mutate(move |addresses| async move { addresses.remove(id).await });
    }

    fn mutate<F, Fut>(&self, operation: F)
    where
        F: FnOnce(Arc<AddressManager>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), ClientError>> + Send + 'static,
    {
        let addresses = Arc::clone(&self.addresses);
        let notice = self.notice.clone();
        self.scope.spawn(async move {
            if let Err(err) = operation(addresses).await {
                warn!(error = %err, "address operation failed");
                notice.send_replace(Some(err.user_message()));
            }
        });
    }
}
