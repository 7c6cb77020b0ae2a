//! Patient record - identifier generated by the backend
//!
//! The create payload deliberately has no id field: patient identifiers are
//! assigned by the patients backend, strictly increasing. A request body that
//! supplies an id fails deserialization outright instead of being silently
//! ignored.

use serde::{Deserialize, Serialize};

use super::validation::{require_text, ValidationError};

const MAX_NAME: usize = 120;
const MAX_GENDER: usize = 16;
const MIN_AGE: i32 = 0;
const MAX_AGE: i32 = 150;

/// A patient as persisted in the patients backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub gender: String,
}

/// Payload for creating a patient. The backend assigns the identifier.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewPatient {
    pub name: String,
    pub age: i32,
    pub gender: String,
}

impl NewPatient {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name, MAX_NAME)?;
        if self.age < MIN_AGE || self.age > MAX_AGE {
            return Err(ValidationError::OutOfRange {
                field: "age",
                min: MIN_AGE,
                max: MAX_AGE,
            });
        }
        require_text("gender", &self.gender, MAX_GENDER)?;
        Ok(())
    }
}
