//! Patient service

use clinica_core::records::{NewPatient, Patient};

use crate::db::repos::{PatientRepo, RepoError};

/// Patient operations against the patients backend.
#[derive(Clone)]
pub struct PatientService {
    repo: PatientRepo,
}

impl PatientService {
    pub fn new(repo: PatientRepo) -> Self {
        Self { repo }
    }

    pub async fn save(&self, new: NewPatient) -> Result<Patient, RepoError> {
        self.repo.create(new).await
    }

    pub async fn get_all(&self) -> Result<Vec<Patient>, RepoError> {
        self.repo.list_all().await
    }
}
