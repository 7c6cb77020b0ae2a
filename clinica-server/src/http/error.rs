//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! Backend failures are logged server-side and returned as a generic body so
//! connection details never leak to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use clinica_core::records::ValidationError;

use crate::db::repos::RepoError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Payload validation failed (400)
    Validation(ValidationError),

    /// Uniqueness constraint violated on the named backend (409)
    Conflict { backend: String },

    /// Backend failure (500, logged)
    Database(RepoError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(e) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "validation_error",
                    "message": e.to_string()
                }),
            ),
            Self::Conflict { backend } => (
                StatusCode::CONFLICT,
                json!({
                    "error": "conflict",
                    "message": format!("record already exists on backend '{}'", backend)
                }),
            ),
            Self::Database(e) => {
                // Log the actual error, return a generic message
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::ConstraintViolation { backend } => Self::Conflict { backend },
            _ => Self::Database(e),
        }
    }
}
