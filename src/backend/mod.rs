//! Reference Bookstore Gateway
//!
//! An in-memory implementation of the bookstore API, for local development
//! and end-to-end tests of the client:
//! - Application state (profiles, books, carts)
//! - Pure helpers (identity, filtering, keys)
//! - REST API handlers
//! - The JSON error body every failure is answered with

pub mod error;
pub mod handlers;
pub mod helpers;
pub mod state;

pub use error::ApiError;
pub use handlers::{routes, API_ROOT};
pub use state::{SharedState, StoreState};
