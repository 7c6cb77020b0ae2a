//! Doctor endpoints

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};

use clinica_core::records::{Doctor, NewDoctor};

use crate::http::error::ApiError;
use crate::http::server::AppState;

/// POST /doctors - create a doctor with a caller-assigned id
async fn create_doctor(
    State(state): State<AppState>,
    Json(req): Json<NewDoctor>,
) -> Result<(StatusCode, Json<Doctor>), ApiError> {
    req.validate()?;
    let doctor = state.doctors().save(req).await?;
    Ok((StatusCode::CREATED, Json(doctor)))
}

/// GET /doctors - list all doctors
async fn list_doctors(State(state): State<AppState>) -> Result<Json<Vec<Doctor>>, ApiError> {
    Ok(Json(state.doctors().get_all().await?))
}

/// Doctor routes
pub fn router() -> Router<AppState> {
    Router::new().route("/doctors", get(list_doctors).post(create_doctor))
}
