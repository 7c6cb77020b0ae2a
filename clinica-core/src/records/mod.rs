//! Record types persisted by the service
//!
//! Every record type maps to exactly one backend; the binding is established
//! from configuration when the server wires up and never changes at runtime.
//! Request payloads are validated here before they reach a repository.

pub mod doctor;
pub mod patient;
pub mod validation;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use doctor::{Doctor, NewDoctor};
pub use patient::{NewPatient, Patient};
pub use validation::ValidationError;

/// The record types this service knows how to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Doctor,
    Patient,
}

impl RecordType {
    /// All record types, in declaration order. Wiring iterates this to make
    /// sure every type resolves to a backend before the server accepts
    /// requests.
    pub const ALL: [RecordType; 2] = [RecordType::Doctor, RecordType::Patient];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Doctor => "doctor",
            RecordType::Patient => "patient",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
