//! Repositories - one per record type, each bound to exactly one backend
//!
//! Each repository follows these patterns:
//! - create opens a transaction on its bound backend, inserts, commits
//! - any failure rolls the transaction back; no partial row survives
//! - list_all is read-only on the bound pool and never fails on empty tables

use thiserror::Error;

pub mod doctors;
pub mod patients;

pub use doctors::DoctorRepo;
pub use patients::PatientRepo;

/// Persistence error, tagged with the backend it came from.
#[derive(Debug, Error)]
pub enum RepoError {
    /// The backend rejected the row for violating a uniqueness constraint
    /// (e.g. a duplicate caller-assigned identifier).
    #[error("constraint violation on backend '{backend}'")]
    ConstraintViolation { backend: String },

    /// Any other persistence failure on the named backend.
    #[error("persistence failure on backend '{backend}': {source}")]
    Persistence {
        backend: String,
        source: sqlx::Error,
    },
}

impl RepoError {
    /// Classify an sqlx error from the named backend.
    fn from_sqlx(backend: &str, source: sqlx::Error) -> Self {
        if let Some(db_err) = source.as_database_error() {
            if db_err.is_unique_violation() {
                return RepoError::ConstraintViolation {
                    backend: backend.to_string(),
                };
            }
        }
        RepoError::Persistence {
            backend: backend.to_string(),
            source,
        }
    }
}
