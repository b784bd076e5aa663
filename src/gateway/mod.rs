//! Bookstore Gateway Module
//!
//! The boundary to the remote bookstore service:
//! - Operation catalogue (names, verbs, paths)
//! - Request/response envelopes with a tagged-union response
//! - Wire models (profiles, books, carts, forms)
//! - The HTTP adapter and the typed API used by the controllers

pub mod api;
pub mod envelope;
pub mod http;
pub mod models;
pub mod operation;

use async_trait::async_trait;

use crate::error::Result;

pub use api::BookstoreApi;
pub use envelope::{RequestEnvelope, ResponseEnvelope, ServiceError};
pub use http::HttpGateway;
pub use operation::Operation;

/// Anything that can carry a request envelope to the bookstore and bring back its response.
///
/// An `Ok` envelope may still be a [`ResponseEnvelope::Failure`]; `Err` is
/// reserved for calls that produced no envelope at all.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn dispatch(&self, request: RequestEnvelope) -> Result<ResponseEnvelope>;
}
