//! HTTP API
//!
//! Request handlers, wire types and routing for the file store endpoints.

pub mod error;
pub mod handlers;
pub mod responses;
pub mod routes;

pub use error::{ApiError, ApiErrorBody};
pub use routes::{AppState, router};
