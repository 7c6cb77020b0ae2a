//! Patient endpoints
//!
//! The create payload has no id field; a body that supplies one fails JSON
//! extraction with 422 before reaching the service.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};

use clinica_core::records::{NewPatient, Patient};

use crate::http::error::ApiError;
use crate::http::server::AppState;

/// POST /patients - create a patient; the backend assigns the id
async fn create_patient(
    State(state): State<AppState>,
    Json(req): Json<NewPatient>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    req.validate()?;
    let patient = state.patients().save(req).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

/// GET /patients - list all patients
async fn list_patients(State(state): State<AppState>) -> Result<Json<Vec<Patient>>, ApiError> {
    Ok(Json(state.patients().get_all().await?))
}

/// Patient routes
pub fn router() -> Router<AppState> {
    Router::new().route("/patients", get(list_patients).post(create_patient))
}
