//! clinica-core: domain records and configuration
//!
//! This crate is the shared foundation for the clinica service: the two
//! record types (doctors and patients) with validation at construction, and
//! the startup configuration that names the relational backends each record
//! type is persisted in.

pub mod config;
pub mod records;

pub use config::{BackendSettings, ClinicaConfig, ServerSettings};
pub use records::{Doctor, NewDoctor, NewPatient, Patient, RecordType, ValidationError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
