//! Client-wide error taxonomy.
//!
//! Adapters catch transport failures and non-success responses at the vendor
//! boundary and convert them into [`ClientError`]; repositories pass errors
//! through unchanged; controllers turn them into user-facing text with
//! [`ClientError::user_message`]. There are no retries and no backoff
//! anywhere — a failed operation is re-run only by an explicit user action.

use thiserror::Error;

use crate::prefs::PrefsError;
use crate::remote::identity::IdentityError;

/// The single error type crossing the repository boundary.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A vendor API answered with a non-success status.
    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        /// Which vendor API answered.
        service: &'static str,
        /// The HTTP status code.
        status: u16,
        /// Response body, truncated to a few hundred characters.
        body: String,
    },

    /// The identity provider rejected a credential operation.
    #[error("identity provider: {0}")]
    Identity(#[from] IdentityError),

    /// A response body did not match the expected shape.
    #[error("response parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The local preference store failed to read or write.
    #[error("preference store: {0}")]
    Prefs(#[from] PrefsError),

    /// No stored session. A branch of its own, not a failure of any call.
    #[error("not logged in")]
    NotLoggedIn,
}

impl ClientError {
    /// Whether this is a network-class failure (unreachable, timed out) as
    /// opposed to a rejection the server actually produced.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// A short message suitable for showing to the shopper.
    ///
    /// Network-class failures, identity rejections, and the logged-out
    /// branch each get their own text; everything else collapses to a
    /// generic message. The original error stays attached for callers that
    /// need the detail.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => {
                "Couldn't reach the store. Check your connection and try again.".to_owned()
            }
            Self::Identity(err) => err.user_message(),
            Self::NotLoggedIn => "Please sign in to continue.".to_owned(),
            Self::Status { .. } | Self::Parse(_) | Self::Prefs(_) => {
                "Something went wrong. Please try again.".to_owned()
            }
        }
    }

    /// Truncate a response body for error display and logs.
    pub(crate) fn excerpt(body: &str) -> String {
        body.chars().take(200).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_render_service_and_code() {
        let err = ClientError::Status {
            service: "admin",
            status: 422,
            body: "{\"errors\":{\"email\":[\"has already been taken\"]}}".to_owned(),
        };
        assert!(err.to_string().starts_with("admin returned HTTP 422"));
        assert!(!err.is_network());
    }

    #[test]
    fn identity_rejections_get_specific_messages() {
        let err = ClientError::from(IdentityError::DuplicateEmail);
        assert!(err.user_message().contains("already registered"));

        let err = ClientError::from(IdentityError::InvalidCredentials);
        assert!(err.user_message().contains("incorrect"));
    }

    #[test]
    fn not_logged_in_is_its_own_branch() {
        let err = ClientError::NotLoggedIn;
        assert!(!err.is_network());
        assert_eq!(err.user_message(), "Please sign in to continue.");
    }

    #[test]
    fn excerpt_caps_long_bodies() {
        let long = "x".repeat(1000);
        assert_eq!(ClientError::excerpt(&long).len(), 200);
    }
}
