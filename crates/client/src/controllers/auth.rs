//! Login and signup screens.

use tokio::sync::watch;

use clementine_core::Email;

use super::{TaskScope, drive, notice_channel};
use crate::repositories::auth::{AuthRepository, RegistrationDraft, Session, StartDestination};
use crate::ui_state::UiState;

/// State holder for the authentication screens.
///
/// The session field starts `Loading` and is driven by whichever flow the
/// shopper triggers; screens route to home once it turns `Success`.
pub struct AuthController {
    auth: AuthRepository,
    scope: TaskScope,
    session: watch::Sender<UiState<Session>>,
    notice: watch::Sender<Option<String>>,
}

impl AuthController {
    /// Create the controller.
    #[must_use]
    pub fn new(auth: AuthRepository) -> Self {
        let (session, _) = watch::channel(UiState::Loading);
        Self {
            auth,
            scope: TaskScope::new(),
            session,
            notice: notice_channel(),
        }
    }

    /// Observe the in-flight authentication attempt.
    #[must_use]
    pub fn session(&self) -> watch::Receiver<UiState<Session>> {
        self.session.subscribe()
    }

    /// Observe the latest user-facing message.
    #[must_use]
    pub fn notice(&self) -> watch::Receiver<Option<String>> {
        self.notice.subscribe()
    }

    /// Where the app should open: home if a session is stored, login
    /// otherwise.
    #[must_use]
    pub fn start_destination(&self) -> StartDestination {
        self.auth.start_destination()
    }

    /// Log in with an email and password.
    ///
    /// A structurally invalid email never leaves the device; it becomes a
    /// notice instead of a network call.
    pub fn login(&self, email: &str, password: String) {
        match Email::parse(email) {
            Ok(email) => drive(
                &self.scope,
                self.session.clone(),
                self.auth.login(email, password),
            ),
            Err(err) => {
                self.notice.send_replace(Some(err.to_string()));
            }
        }
    }

    /// Log in with a federated provider token.
    pub fn login_federated(&self, provider_token: String) {
        drive(
            &self.scope,
            self.session.clone(),
            self.auth.login_federated(provider_token),
        );
    }

    /// Register a new shopper.
    pub fn signup(
        &self,
        first_name: String,
        last_name: String,
        email: &str,
        phone: Option<String>,
        password: String,
    ) {
        match Email::parse(email) {
            Ok(email) => drive(
                &self.scope,
                self.session.clone(),
                self.auth.register(RegistrationDraft {
                    first_name,
                    last_name,
                    email,
                    phone,
                    password,
                }),
            ),
            Err(err) => {
                self.notice.send_replace(Some(err.to_string()));
            }
        }
    }

    /// Clear the stored session.
    pub fn logout(&self) {
        if let Err(err) = self.auth.logout() {
            self.notice.send_replace(Some(err.user_message()));
        }
    }
}
