//! Doctor service

use clinica_core::records::{Doctor, NewDoctor};

use crate::db::repos::{DoctorRepo, RepoError};

/// Doctor operations against the doctors backend.
#[derive(Clone)]
pub struct DoctorService {
    repo: DoctorRepo,
}

impl DoctorService {
    pub fn new(repo: DoctorRepo) -> Self {
        Self { repo }
    }

    pub async fn save(&self, new: NewDoctor) -> Result<Doctor, RepoError> {
        self.repo.create(new).await
    }

    pub async fn get_all(&self) -> Result<Vec<Doctor>, RepoError> {
        self.repo.list_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::registry::{BackendDescriptor, BackendRegistry, Dialect};
    use crate::db::schema;
    use clinica_core::records::RecordType;

    #[tokio::test]
    async fn save_and_get_all_delegate_to_the_repo() {
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

        let service = DoctorService::new(DoctorRepo::new(backend));
        let saved = service
            .save(NewDoctor {
                id: 1,
                name: "Smith".to_string(),
                specialization: "Cardiology".to_string(),
                address: "12 Elm St".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(service.get_all().await.unwrap(), vec![saved]);
    }
}
