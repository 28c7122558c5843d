//! Feature-scoped operations for presentation code.
//!
//! Repositories compose one or more remote adapters into small capability
//! interfaces. Reads meant to drive a screen return a lazy stream of
//! [`UiState`](crate::ui_state::UiState) values built on
//! [`fetch_state`](crate::ui_state::fetch_state); one-shot writes return a
//! direct `Result`. Errors pass through unchanged - mapping to user-facing
//! text happens in the controllers.

pub mod auth;
pub mod checkout;
pub mod products;

pub use auth::{AuthRepository, Session, StartDestination};
pub use checkout::CheckoutRepository;
pub use products::ProductRepository;
