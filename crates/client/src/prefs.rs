//! Local key-value preference store.
//!
//! A single JSON file holding the only state that survives an app restart:
//! the current session's customer reference (the fast "is logged in" check),
//! the cart's draft-order id, and the minimal fields needed to resume a
//! payment sheet. Everything else lives in memory and is re-fetched from the
//! platform on demand.
//!
//! Writes serialize the whole document and replace the file atomically via a
//! temp-file rename, so a crash mid-write never leaves a torn file behind.
//! The document is a few hundred bytes; blocking I/O under the lock is
//! deliberate.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use clementine_core::{CustomerId, DraftOrderId};

/// Errors from the preference store.
#[derive(Debug, Error)]
pub enum PrefsError {
    /// Reading or writing the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The file exists but does not parse as a preference document.
    #[error("corrupt preference file: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// The stored session reference: who is logged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    /// The platform customer this session belongs to.
    pub customer_id: CustomerId,
    /// The email the customer signed in with.
    pub email: String,
    /// The identity provider's session token, used for attribute reads.
    pub id_token: String,
}

/// The minimal payment-processor state needed to resume a payment sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSession {
    /// Payment-processor customer id (`cus_...`).
    pub customer_id: String,
    /// Ephemeral key secret scoped to that customer.
    pub ephemeral_key_secret: Option<String>,
    /// Client secret of the most recent payment intent.
    pub payment_intent_client_secret: Option<String>,
}

/// On-disk document shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PrefsDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    session: Option<StoredSession>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cart_draft_order_id: Option<DraftOrderId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payment: Option<PaymentSession>,
}

/// JSON-file-backed key-value store for the session, cart id, and payment
/// session.
#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    doc: Mutex<PrefsDocument>,
}

impl PreferenceStore {
    /// Open the store at `path`, creating an empty document if the file
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PrefsError> {
        let path = path.as_ref().to_path_buf();
        let doc = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => PrefsDocument::default(),
            Err(err) => return Err(err.into()),
        };
        debug!(path = %path.display(), "opened preference store");
        Ok(Self {
            path,
            doc: Mutex::new(doc),
        })
    }

    /// The current session, if a customer is logged in.
    #[must_use]
    pub fn session(&self) -> Option<StoredSession> {
        self.lock().session.clone()
    }

    /// Store the session reference after a successful login or registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    pub fn set_session(&self, session: StoredSession) -> Result<(), PrefsError> {
        self.mutate(|doc| doc.session = Some(session))
    }

    /// Clear the session on logout. The cart id and payment session go with
    /// it; they belong to the customer, not the device.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    pub fn clear_session(&self) -> Result<(), PrefsError> {
        self.mutate(|doc| *doc = PrefsDocument::default())
    }

    /// The draft order backing the cart, if one exists.
    #[must_use]
    pub fn cart_draft_order_id(&self) -> Option<DraftOrderId> {
        self.lock().cart_draft_order_id
    }

    /// Remember the draft order backing the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    pub fn set_cart_draft_order_id(&self, id: DraftOrderId) -> Result<(), PrefsError> {
        self.mutate(|doc| doc.cart_draft_order_id = Some(id))
    }

    /// Forget the draft order after it was deleted or converted.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    pub fn clear_cart_draft_order_id(&self) -> Result<(), PrefsError> {
        self.mutate(|doc| doc.cart_draft_order_id = None)
    }

    /// The stored payment-processor session, if any.
    #[must_use]
    pub fn payment_session(&self) -> Option<PaymentSession> {
        self.lock().payment.clone()
    }

    /// Store the payment-processor session.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    pub fn set_payment_session(&self, payment: PaymentSession) -> Result<(), PrefsError> {
        self.mutate(|doc| doc.payment = Some(payment))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PrefsDocument> {
        // A poisoned lock means a panic mid-mutation; the in-memory document
        // is still the last fully-applied state, so keep serving it.
        self.doc.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn mutate(&self, apply: impl FnOnce(&mut PrefsDocument)) -> Result<(), PrefsError> {
        let mut doc = self.lock();
        apply(&mut doc);
        persist(&self.path, &doc)
    }
}

/// Write the document to a sibling temp file, then rename over the target.
fn persist(path: &Path, doc: &PrefsDocument) -> Result<(), PrefsError> {
    let contents = serde_json::to_vec_pretty(doc)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_store() -> (PreferenceStore, PathBuf) {
        let path = std::env::temp_dir().join(format!("clementine-prefs-{}.json", uuid::Uuid::new_v4()));
        (PreferenceStore::open(&path).unwrap(), path)
    }

    #[test]
    fn missing_file_opens_empty() {
        let (store, path) = temp_store();
        assert!(store.session().is_none());
        assert!(store.cart_draft_order_id().is_none());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn session_round_trips_across_reopen() {
        let (store, path) = temp_store();
        store
            .set_session(StoredSession {
                customer_id: CustomerId::new(123),
                email: "a@b.com".to_owned(),
                id_token: "tok".to_owned(),
            })
            .unwrap();
        drop(store);

        let reopened = PreferenceStore::open(&path).unwrap();
        let session = reopened.session().unwrap();
        assert_eq!(session.customer_id, CustomerId::new(123));
        assert_eq!(session.email, "a@b.com");
        let _ = fs::remove_file(path);
    }

    #[test]
    fn clear_session_drops_everything() {
        let (store, path) = temp_store();
        store
            .set_session(StoredSession {
                customer_id: CustomerId::new(1),
                email: "x@y.z".to_owned(),
                id_token: "tok".to_owned(),
            })
            .unwrap();
        store.set_cart_draft_order_id(DraftOrderId::new(9)).unwrap();
        store.clear_session().unwrap();

        assert!(store.session().is_none());
        assert!(store.cart_draft_order_id().is_none());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn corrupt_file_is_reported_not_swallowed() {
        let path = std::env::temp_dir().join(format!("clementine-prefs-{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, b"{not json").unwrap();
        assert!(matches!(
            PreferenceStore::open(&path),
            Err(PrefsError::Corrupt(_))
        ));
        let _ = fs::remove_file(path);
    }
}
