//! Doctor repository - caller-assigned identifiers

use sqlx::AnyPool;

use clinica_core::records::{Doctor, NewDoctor};

use crate::db::registry::Backend;

use super::RepoError;

#[derive(Debug, sqlx::FromRow)]
struct DoctorRow {
    id: i32,
    name: String,
    specialization: String,
    address: String,
}

impl From<DoctorRow> for Doctor {
    fn from(row: DoctorRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            specialization: row.specialization,
            address: row.address,
        }
    }
}

/// Doctor persistence, bound to the doctors backend at construction.
#[derive(Clone)]
pub struct DoctorRepo {
    backend: String,
    pool: AnyPool,
}

impl DoctorRepo {
    pub fn new(backend: &Backend) -> Self {
        Self {
            backend: backend.identifier().to_string(),
            pool: backend.pool().clone(),
        }
    }

    /// Insert one doctor inside a transaction on the doctors backend.
    ///
    /// The caller assigns the identifier; a duplicate surfaces as
    /// `RepoError::ConstraintViolation` and leaves the existing row
    /// untouched. On any failure the transaction rolls back on drop, so no
    /// partial row survives.
    pub async fn create(&self, new: NewDoctor) -> Result<Doctor, RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::from_sqlx(&self.backend, e))?;

        sqlx::query("INSERT INTO doctors (id, name, specialization, address) VALUES ($1, $2, $3, $4)")
            .bind(new.id)
            .bind(&new.name)
            .bind(&new.specialization)
            .bind(&new.address)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::from_sqlx(&self.backend, e))?;

        tx.commit()
            .await
            .map_err(|e| RepoError::from_sqlx(&self.backend, e))?;

        tracing::debug!(backend = %self.backend, id = new.id, "doctor created");

        Ok(Doctor {
            id: new.id,
            name: new.name,
            specialization: new.specialization,
            address: new.address,
        })
    }

    /// All doctors on the bound backend. Ordering is whatever the backend
    /// returns; callers must not rely on it.
    pub async fn list_all(&self) -> Result<Vec<Doctor>, RepoError> {
        let rows: Vec<DoctorRow> =
            sqlx::query_as("SELECT id, name, specialization, address FROM doctors")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| RepoError::from_sqlx(&self.backend, e))?;

        Ok(rows.into_iter().map(Doctor::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::registry::{BackendDescriptor, BackendRegistry, Dialect};
    use crate::db::schema;
    use clinica_core::records::RecordType;

    async fn doctors_registry() -> BackendRegistry {
        let mut registry = BackendRegistry::new();
        registry
            .register(BackendDescriptor {
                identifier: "records-a".to_string(),
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
                dialect: Dialect::Sqlite,
                is_default: true,
            })
            .await
            .unwrap();

        let backend = registry.get("records-a").unwrap();
        schema::ensure_record_table(backend, RecordType::Doctor)
            .await
            .unwrap();
        registry
    }

    fn smith() -> NewDoctor {
        NewDoctor {
            id: 1,
            name: "Smith".to_string(),
            specialization: "Cardiology".to_string(),
            address: "12 Elm St".to_string(),
        }
    }

    #[tokio::test]
    async fn create_then_list_returns_the_record() {
        let registry = doctors_registry().await;
        let repo = DoctorRepo::new(registry.get("records-a").unwrap());

        let created = repo.create(smith()).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.name, "Smith");

        let all = repo.list_all().await.unwrap();
        assert_eq!(all, vec![created]);
    }

    #[tokio::test]
    async fn list_on_empty_backend_is_empty_not_an_error() {
        let registry = doctors_registry().await;
        let repo = DoctorRepo::new(registry.get("records-a").unwrap());

        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_id_fails_and_leaves_prior_row_unchanged() {
        let registry = doctors_registry().await;
        let repo = DoctorRepo::new(registry.get("records-a").unwrap());

        repo.create(smith()).await.unwrap();

        let mut second = smith();
        second.name = "Jones".to_string();

        let err = repo.create(second.clone()).await.unwrap_err();
        assert!(matches!(err, RepoError::ConstraintViolation { ref backend } if backend == "records-a"));

        // Retrying the same duplicate fails identically and corrupts nothing.
        let err = repo.create(second).await.unwrap_err();
        assert!(matches!(err, RepoError::ConstraintViolation { .. }));

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Smith");
    }
}
