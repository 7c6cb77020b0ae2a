//! HTTP layer - axum server, JSON errors, record routes
//!
//! Request parsing and response encoding stop here; everything below works
//! in domain types. Errors map to JSON bodies with appropriate status codes.

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{run_server, AppState, ServerConfig};
