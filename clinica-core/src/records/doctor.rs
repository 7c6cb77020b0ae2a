//! Doctor record - identifier assigned by the caller
//!
//! Doctors keep the identifier the caller supplies; the backend enforces
//! uniqueness, so a duplicate id surfaces as a constraint violation rather
//! than silently overwriting an existing row.

use serde::{Deserialize, Serialize};

use super::validation::{require_text, ValidationError};

const MAX_NAME: usize = 120;
const MAX_SPECIALIZATION: usize = 120;
const MAX_ADDRESS: usize = 200;

/// A doctor as persisted in the doctors backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i32,
    pub name: String,
    pub specialization: String,
    pub address: String,
}

/// Payload for creating a doctor. The caller assigns the identifier.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewDoctor {
    pub id: i32,
    pub name: String,
    pub specialization: String,
    pub address: String,
}

impl NewDoctor {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id < 1 {
            return Err(ValidationError::NotPositive { field: "id" });
        }
        require_text("name", &self.name, MAX_NAME)?;
        require_text("specialization", &self.specialization, MAX_SPECIALIZATION)?;
        require_text("address", &self.address, MAX_ADDRESS)?;
        Ok(())
    }
}
