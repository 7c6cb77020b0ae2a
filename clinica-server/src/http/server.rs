//! Axum server setup and startup wiring
//!
//! Wiring order: register backends (pools open eagerly), bind record types
//! through the router, bootstrap tables, build services. Every record type
//! must resolve to a reachable backend before the listener binds; any wiring
//! defect aborts startup. Serves with graceful shutdown on Ctrl+C/SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use clinica_core::config::ClinicaConfig;
use clinica_core::records::RecordType;

use crate::db::registry::{BackendDescriptor, BackendRegistry, RegistryError};
use crate::db::repos::{DoctorRepo, PatientRepo};
use crate::db::router::{RecordRouter, RoutingError};
use crate::db::schema;
use crate::http::routes;
use crate::services::{DoctorService, PatientService};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3400)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = same-origin only)
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3400)),
            cors_permissive: false,
        }
    }
}

/// Startup error type
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("backend registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("record routing error: {0}")]
    Routing(#[from] RoutingError),

    #[error("schema bootstrap failed: {0}")]
    Schema(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared application state, immutable once the server is wired.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    registry: BackendRegistry,
    doctors: DoctorService,
    patients: PatientService,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(registry: BackendRegistry, doctors: DoctorService, patients: PatientService) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                registry,
                doctors,
                patients,
            }),
        }
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.inner.registry
    }

    pub fn doctors(&self) -> &DoctorService {
        &self.inner.doctors
    }

    pub fn patients(&self) -> &PatientService {
        &self.inner.patients
    }
}

/// Wire registry, router, schema, and services from configuration.
///
/// This is the whole startup sequence short of binding the listener, split
/// out so integration tests can drive the stack in-process.
pub async fn build_state(config: &ClinicaConfig) -> Result<AppState, ServerError> {
    let mut registry = BackendRegistry::new();
    for settings in &config.backends {
        let descriptor = BackendDescriptor::from_settings(settings)?;
        registry.register(descriptor).await?;
    }

    // Exactly one default must exist; surface the defect before serving.
    let default = registry.default_backend()?;
    tracing::info!(backend = default.identifier(), "default backend");

    let mut router = RecordRouter::new();
    for settings in &config.backends {
        for record in &settings.records {
            router.bind(*record, &registry, &settings.identifier)?;
        }
    }

    // Every record type must resolve and have its table in place.
    for record in RecordType::ALL {
        let backend = registry.get(router.resolve(record)?)?;
        schema::ensure_record_table(backend, record).await?;
    }

    let doctors = DoctorService::new(DoctorRepo::new(
        registry.get(router.resolve(RecordType::Doctor)?)?,
    ));
    let patients = PatientService::new(PatientRepo::new(
        registry.get(router.resolve(RecordType::Patient)?)?,
    ));

    Ok(AppState::new(registry, doctors, patients))
}

/// Build the application router with all routes.
pub fn build_router(state: AppState, cors_permissive: bool) -> Router {
    let mut app = Router::new()
        .merge(routes::health::router())
        .merge(routes::doctors::router())
        .merge(routes::patients::router());

    if cors_permissive {
        tracing::warn!("CORS: permissive mode enabled - all origins allowed");
        app = app.layer(CorsLayer::permissive());
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Run the HTTP server.
pub async fn run_server(config: ClinicaConfig, server: ServerConfig) -> Result<(), ServerError> {
    let state = build_state(&config).await?;
    let app = build_router(state, server.cors_permissive);

    let listener = TcpListener::bind(server.bind_addr).await?;
    tracing::info!("Server listening on {}", server.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinica_core::config::{BackendSettings, ServerSettings};

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 3400);
        assert!(!config.cors_permissive);
    }

    fn memory_config() -> ClinicaConfig {
        ClinicaConfig {
            server: ServerSettings::default(),
            backends: vec![
                BackendSettings {
                    identifier: "records-a".to_string(),
                    url: "sqlite::memory:".to_string(),
                    max_connections: 1,
                    default: true,
                    records: vec![RecordType::Doctor],
                },
                BackendSettings {
                    identifier: "records-b".to_string(),
                    url: "sqlite::memory:".to_string(),
                    max_connections: 1,
                    default: false,
                    records: vec![RecordType::Patient],
                },
            ],
        }
    }

    #[tokio::test]
    async fn build_state_wires_both_backends() {
        let state = build_state(&memory_config()).await.unwrap();
        assert_eq!(state.registry().len(), 2);
        assert_eq!(
            state.registry().default_backend().unwrap().identifier(),
            "records-a"
        );
    }

    #[tokio::test]
    async fn build_state_rejects_missing_default() {
        let mut config = memory_config();
        config.backends[0].default = false;

        let err = build_state(&config).await.unwrap_err();
        assert!(matches!(
            err,
            ServerError::Registry(RegistryError::NoDefaultBackend)
        ));
    }

    #[tokio::test]
    async fn build_state_rejects_unbound_record_type() {
        let mut config = memory_config();
        config.backends[1].records.clear();

        let err = build_state(&config).await.unwrap_err();
        assert!(matches!(
            err,
            ServerError::Routing(RoutingError::UnboundRecordType {
                record: RecordType::Patient
            })
        ));
    }
}
