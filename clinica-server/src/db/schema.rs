//! Table bootstrap for record backends
//!
//! Repositories assume their tables already exist; `ensure_record_table`
//! creates them at serve startup. The DDL for generated identifiers differs
//! by dialect: PostgreSQL uses an identity column, SQLite uses
//! AUTOINCREMENT. Both assign strictly increasing ids and never reuse one.

use clinica_core::records::RecordType;

use super::registry::{Backend, Dialect};

const DOCTORS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS doctors (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    specialization TEXT NOT NULL,
    address TEXT NOT NULL
)
"#;

const PATIENTS_TABLE_POSTGRES: &str = r#"
CREATE TABLE IF NOT EXISTS patients (
    id INTEGER GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
    name TEXT NOT NULL,
    age INTEGER NOT NULL,
    gender TEXT NOT NULL
)
"#;

const PATIENTS_TABLE_SQLITE: &str = r#"
CREATE TABLE IF NOT EXISTS patients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    age INTEGER NOT NULL,
    gender TEXT NOT NULL
)
"#;

/// Create the table for one record type on the backend it is bound to.
pub async fn ensure_record_table(
    backend: &Backend,
    record: RecordType,
) -> Result<(), sqlx::Error> {
    let ddl = match (record, backend.dialect()) {
        (RecordType::Doctor, _) => DOCTORS_TABLE,
        (RecordType::Patient, Dialect::Postgres) => PATIENTS_TABLE_POSTGRES,
        (RecordType::Patient, Dialect::Sqlite) => PATIENTS_TABLE_SQLITE,
    };

    sqlx::query(ddl).execute(backend.pool()).await?;
    tracing::debug!(record = %record, backend = backend.identifier(), "table ensured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::registry::{BackendDescriptor, BackendRegistry};

    #[tokio::test]
    async fn bootstrap_is_idempotent() {
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
        ensure_record_table(backend, RecordType::Doctor).await.unwrap();
        ensure_record_table(backend, RecordType::Doctor).await.unwrap();

        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM doctors")
            .fetch_one(backend.pool())
            .await
            .unwrap();
        assert_eq!(row.0, 0);
    }
}
