//! End-to-end tests through the HTTP router
//!
//! Each test wires the full stack against two separate on-disk SQLite
//! databases in a fresh temp directory, so doctors and patients really live
//! in different backends with their own pools.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use clinica_core::config::{BackendSettings, ClinicaConfig, ServerSettings};
use clinica_core::records::RecordType;
use clinica_server::http::server::{build_router, build_state};

async fn test_app() -> (Router, TempDir) {
    let dir = TempDir::new().unwrap();
    let doctors_url = format!("sqlite://{}?mode=rwc", dir.path().join("doctors.db").display());
    let patients_url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("patients.db").display()
    );

    let config = ClinicaConfig {
        server: ServerSettings::default(),
        backends: vec![
            BackendSettings {
                identifier: "records-a".to_string(),
                url: doctors_url,
                max_connections: 2,
                default: true,
                records: vec![RecordType::Doctor],
            },
            BackendSettings {
                identifier: "records-b".to_string(),
                url: patients_url,
                max_connections: 2,
                default: false,
                records: vec![RecordType::Patient],
            },
        ],
    };

    let state = build_state(&config).await.unwrap();
    (build_router(state, false), dir)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn doctor_create_then_list_roundtrip() {
    let (app, _dir) = test_app().await;

    let doctor = json!({
        "id": 1,
        "name": "Smith",
        "specialization": "Cardiology",
        "address": "12 Elm St"
    });

    let (status, created) = post_json(&app, "/doctors", doctor.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created, doctor);

    let (status, listed) = get_json(&app, "/doctors").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([doctor]));
}

#[tokio::test]
async fn patients_get_distinct_generated_ids() {
    let (app, _dir) = test_app().await;

    let jane = json!({"name": "Jane", "age": 30, "gender": "F"});

    let (status, first) = post_json(&app, "/patients", jane.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    let first_id = first["id"].as_i64().expect("generated id");

    let (status, second) = post_json(&app, "/patients", jane).await;
    assert_eq!(status, StatusCode::CREATED);
    let second_id = second["id"].as_i64().expect("generated id");

    assert_ne!(first_id, second_id);

    let (status, listed) = get_json(&app, "/patients").await;
    assert_eq!(status, StatusCode::OK);
    let mut ids: Vec<i64> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    ids.sort_unstable();
    let mut expected = vec![first_id, second_id];
    expected.sort_unstable();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn duplicate_doctor_id_conflicts_and_keeps_one_row() {
    let (app, _dir) = test_app().await;

    let doctor = json!({
        "id": 1,
        "name": "Smith",
        "specialization": "Cardiology",
        "address": "12 Elm St"
    });

    let (status, _) = post_json(&app, "/doctors", doctor.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_json(&app, "/doctors", doctor.clone()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (status, listed) = get_json(&app, "/doctors").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([doctor]));
}

#[tokio::test]
async fn supplied_patient_id_is_rejected() {
    let (app, _dir) = test_app().await;

    let (status, _) = post_json(
        &app,
        "/patients",
        json!({"id": 7, "name": "Jane", "age": 30, "gender": "F"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, listed) = get_json(&app, "/patients").await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn invalid_doctor_payload_is_400() {
    let (app, _dir) = test_app().await;

    let (status, body) = post_json(
        &app,
        "/doctors",
        json!({"id": 1, "name": "", "specialization": "Cardiology", "address": "12 Elm St"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn listing_an_empty_resource_returns_an_empty_array() {
    let (app, _dir) = test_app().await;

    let (status, doctors) = get_json(&app, "/doctors").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doctors, json!([]));

    let (status, patients) = get_json(&app, "/patients").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patients, json!([]));
}

#[tokio::test]
async fn records_land_in_separate_backends() {
    let (app, _dir) = test_app().await;

    let (status, _) = post_json(
        &app,
        "/doctors",
        json!({"id": 5, "name": "Adams", "specialization": "Neurology", "address": "4 Oak Ave"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // The patients backend saw nothing from the doctors request.
    let (_, patients) = get_json(&app, "/patients").await;
    assert_eq!(patients, json!([]));

    let (status, _) = post_json(&app, "/patients", json!({"name": "Jane", "age": 30, "gender": "F"})).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, doctors) = get_json(&app, "/doctors").await;
    assert_eq!(doctors.as_array().unwrap().len(), 1);
    let (_, patients) = get_json(&app, "/patients").await;
    assert_eq!(patients.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn health_reports_registered_backends() {
    let (app, _dir) = test_app().await;

    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["backends"], json!(["records-a", "records-b"]));
}
