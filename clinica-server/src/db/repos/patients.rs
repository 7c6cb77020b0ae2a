//! Patient repository - backend-generated identifiers

use sqlx::AnyPool;

use clinica_core::records::{NewPatient, Patient};

use crate::db::registry::Backend;

use super::RepoError;

#[derive(Debug, sqlx::FromRow)]
struct PatientRow {
    id: i32,
    name: String,
    age: i32,
    gender: String,
}

impl From<PatientRow> for Patient {
    fn from(row: PatientRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            age: row.age,
            gender: row.gender,
        }
    }
}

/// Patient persistence, bound to the patients backend at construction.
#[derive(Clone)]
pub struct PatientRepo {
    backend: String,
    pool: AnyPool,
}

impl PatientRepo {
    pub fn new(backend: &Backend) -> Self {
        Self {
            backend: backend.identifier().to_string(),
            pool: backend.pool().clone(),
        }
    }

    /// Insert one patient inside a transaction on the patients backend and
    /// return the row with its generated identifier.
    ///
    /// Identifiers are assigned by the backend, strictly increasing across
    /// the lifetime of the table. On any failure the transaction rolls back
    /// on drop.
    pub async fn create(&self, new: NewPatient) -> Result<Patient, RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::from_sqlx(&self.backend, e))?;

        let row: PatientRow = sqlx::query_as(
            "INSERT INTO patients (name, age, gender) VALUES ($1, $2, $3) RETURNING id, name, age, gender",
        )
        .bind(&new.name)
        .bind(new.age)
        .bind(&new.gender)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepoError::from_sqlx(&self.backend, e))?;

        tx.commit()
            .await
            .map_err(|e| RepoError::from_sqlx(&self.backend, e))?;

        tracing::debug!(backend = %self.backend, id = row.id, "patient created");

        Ok(Patient::from(row))
    }

    /// All patients on the bound backend. Ordering is whatever the backend
    /// returns; callers must not rely on it.
    pub async fn list_all(&self) -> Result<Vec<Patient>, RepoError> {
        let rows: Vec<PatientRow> = sqlx::query_as("SELECT id, name, age, gender FROM patients")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::from_sqlx(&self.backend, e))?;

        Ok(rows.into_iter().map(Patient::from).collect())
    }
}
