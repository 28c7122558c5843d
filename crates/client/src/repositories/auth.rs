//! Authentication: two identity systems composed into one state machine.
//!
//! Every account lives in two places: a platform customer record (the admin
//! API) and an identity-provider credential, linked by the numeric customer
//! id stored as an account attribute.
//!
//! Registration creates the platform customer **first** and only on success
//! creates the credential. A credential failure after that leaves the
//! platform customer behind - there is no compensating delete. That is the
//! current design, preserved deliberately; callers see a plain `Error`.
//!
//! Login verifies the credential, resolves the linked customer (attribute
//! first, email lookup as fallback for accounts predating the attribute),
//! and persists the session reference for the fast logged-in check at
//! startup.

use std::sync::Arc;

use futures::Stream;
use tracing::{info, warn};

use clementine_core::{CustomerId, Email};

use crate::error::ClientError;
use crate::models::CustomerDraft;
use crate::prefs::{PreferenceStore, StoredSession};
use crate::remote::identity::IdentityError;
use crate::remote::{CustomersApi, IdentityApi};
use crate::ui_state::{UiState, fetch_state};

/// The logged-in customer, as screens see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub customer_id: CustomerId,
    pub email: String,
}

/// Which screen the app opens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartDestination {
    /// A session is stored; go straight to shopping.
    Home,
    /// No session; show the login screen.
    Login,
}

/// Everything a new shopper types into the signup screen.
#[derive(Debug, Clone)]
pub struct RegistrationDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub password: String,
}

/// Registration, login, and session routing.
#[derive(Clone)]
pub struct AuthRepository {
    customers: Arc<dyn CustomersApi>,
    identity: Arc<dyn IdentityApi>,
    prefs: Arc<PreferenceStore>,
}

impl AuthRepository {
    /// Create a repository over the platform and identity adapters.
    #[must_use]
    pub fn new(
        customers: Arc<dyn CustomersApi>,
        identity: Arc<dyn IdentityApi>,
        prefs: Arc<PreferenceStore>,
    ) -> Self {
        Self {
            customers,
            identity,
            prefs,
        }
    }

    /// Register a new shopper: platform customer first, then the identity
    /// credential bound to the returned customer id.
    ///
    /// Any step failing short-circuits to `Error`. A platform customer
    /// created before a failing credential step is not rolled back.
    pub fn register(
        &self,
        draft: RegistrationDraft,
    ) -> impl Stream<Item = UiState<Session>> + Send + 'static {
        let this = self.clone();
        fetch_state(async move {
            let customer = this
                .customers
                .create_customer(CustomerDraft {
                    email: draft.email.to_string(),
                    first_name: draft.first_name,
                    last_name: draft.last_name,
                    phone: draft.phone,
                    password: Some(draft.password.clone()),
                    password_confirmation: Some(draft.password.clone()),
                })
                .await?;
            info!(customer_id = %customer.id, "platform customer created");

            let account = this
                .identity
                .sign_up(draft.email.as_str(), &draft.password)
                .await?;
            this.identity
                .set_customer_id(&account.id_token, customer.id)
                .await?;

            this.store_session(customer.id, &account.email, &account.id_token)
        })
    }

    /// Log in with a password credential.
    pub fn login(
        &self,
        email: Email,
        password: String,
    ) -> impl Stream<Item = UiState<Session>> + Send + 'static {
        let this = self.clone();
        fetch_state(async move {
            let account = this.identity.sign_in(email.as_str(), &password).await?;
            let customer_id = this.resolve_customer(&account.id_token, &account.email).await?;
            this.store_session(customer_id, &account.email, &account.id_token)
        })
    }

    /// Log in with a federated credential (a provider id token).
    ///
    /// A federated account seen for the first time gets a platform customer
    /// created for it and linked, so both identity systems stay paired.
    pub fn login_federated(
        &self,
        provider_token: String,
    ) -> impl Stream<Item = UiState<Session>> + Send + 'static {
        let this = self.clone();
        fetch_state(async move {
            let account = this.identity.sign_in_federated(&provider_token).await?;

            let customer_id = match this.linked_customer(&account.id_token, &account.email).await? {
                Some(id) => id,
                None => {
                    // First federated sign-in: create the platform half.
                    let local_part = account.email.split('@').next().unwrap_or_default();
                    let customer = this
                        .customers
                        .create_customer(CustomerDraft {
                            email: account.email.clone(),
                            first_name: local_part.to_owned(),
                            last_name: String::new(),
                            phone: None,
                            password: None,
                            password_confirmation: None,
                        })
                        .await?;
                    customer.id
                }
            };

            this.identity
                .set_customer_id(&account.id_token, customer_id)
                .await?;
            this.store_session(customer_id, &account.email, &account.id_token)
        })
    }

    /// The stored session, if a customer is logged in.
    ///
    /// This is the cached logged-in check: it reads the preference store
    /// only and never touches the network.
    #[must_use]
    pub fn current_session(&self) -> Option<Session> {
        self.prefs.session().map(|stored| Session {
            customer_id: stored.customer_id,
            email: stored.email,
        })
    }

    /// Initial routing: `Home` when a session is stored, `Login` otherwise.
    /// Absence is a branch, not an error.
    #[must_use]
    pub fn start_destination(&self) -> StartDestination {
        if self.current_session().is_some() {
            StartDestination::Home
        } else {
            StartDestination::Login
        }
    }

    /// Clear the stored session.
    ///
    /// # Errors
    ///
    /// Returns an error if the preference store cannot be written.
    pub fn logout(&self) -> Result<(), ClientError> {
        self.prefs.clear_session()?;
        Ok(())
    }

    /// The platform customer linked to an identity account, if any:
    /// account attribute first, then an email lookup for accounts created
    /// before the attribute existed.
    async fn linked_customer(
        &self,
        id_token: &str,
        email: &str,
    ) -> Result<Option<CustomerId>, ClientError> {
        if let Some(id) = self.identity.customer_id(id_token).await? {
            return Ok(Some(id));
        }
        warn!("identity account has no linked customer attribute, falling back to email lookup");
        Ok(self
            .customers
            .customer_by_email(email)
            .await?
            .map(|customer| customer.id))
    }

    /// Like [`Self::linked_customer`], but an unlinked account is an error.
    async fn resolve_customer(
        &self,
        id_token: &str,
        email: &str,
    ) -> Result<CustomerId, ClientError> {
        self.linked_customer(id_token, email)
            .await?
            .ok_or_else(|| IdentityError::Rejected("UNLINKED_ACCOUNT".to_owned()).into())
    }

    fn store_session(
        &self,
        customer_id: CustomerId,
        email: &str,
        id_token: &str,
    ) -> Result<Session, ClientError> {
        self.prefs.set_session(StoredSession {
            customer_id,
            email: email.to_owned(),
            id_token: id_token.to_owned(),
        })?;
        Ok(Session {
            customer_id,
            email: email.to_owned(),
        })
    }
}
