//! Clementine client library.
//!
//! This crate is the headless core of the Clementine shopping app: everything
//! the app does below the rendering layer.
//!
//! # Architecture
//!
//! Data flows one way: UI event → controller method → repository call →
//! remote adapter → vendor HTTP API → response mapped to [`UiState`] →
//! published through a watch channel → UI re-renders.
//!
//! - [`remote`] - HTTP adapters for the platform admin API, identity
//!   provider, payment processor, and currency exchange
//! - [`repositories`] - feature-scoped operations returning lazy streams of
//!   [`UiState`] values (reads) or direct results (writes)
//! - [`managers`] - single-source-of-truth observable collections (cart,
//!   wishlist, addresses, orders)
//! - [`controllers`] - per-screen state holders with lifecycle-scoped tasks
//! - [`state`] - the [`App`] composition root, built once at startup
//!
//! The platform is always the source of truth; local state is a cache valid
//! for the current screen or session. The only on-device persistence is the
//! JSON preference store holding the session reference, the cart's draft
//! order id, and the fields needed to resume a payment sheet.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod controllers;
pub mod error;
pub mod managers;
pub mod models;
pub mod prefs;
pub mod remote;
pub mod repositories;
pub mod state;
pub mod ui_state;

pub use config::AppConfig;
pub use error::ClientError;
pub use state::App;
pub use ui_state::UiState;
