//! Backend registry - one connection pool per relational backend
//!
//! The registry maps a backend identifier to its descriptor and open pool.
//! Registration opens the pool eagerly so an unreachable database aborts
//! startup instead of failing the first request. Exactly one registered
//! backend is the process-wide default. The registry is built mutably while
//! wiring and shared read-only afterwards; lookups take no locks.

use std::collections::HashMap;
use std::sync::Once;

use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use thiserror::Error;

use clinica_core::config::BackendSettings;

/// SQL dialect of a backend, parsed from its connection URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    pub fn from_url(url: &str) -> Option<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Some(Dialect::Postgres)
        } else if url.starts_with("sqlite:") {
            Some(Dialect::Sqlite)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::Sqlite => "sqlite",
        }
    }
}

/// Static description of one backend, built from configuration at startup
/// and immutable afterwards.
#[derive(Debug, Clone)]
pub struct BackendDescriptor {
    pub identifier: String,
    pub url: String,
    pub max_connections: u32,
    pub dialect: Dialect,
    pub is_default: bool,
}

impl BackendDescriptor {
    /// Build a descriptor from its config entry, resolving the dialect from
    /// the URL scheme.
    pub fn from_settings(settings: &BackendSettings) -> Result<Self, RegistryError> {
        let dialect =
            Dialect::from_url(&settings.url).ok_or_else(|| RegistryError::UnsupportedUrl {
                identifier: settings.identifier.clone(),
            })?;

        Ok(Self {
            identifier: settings.identifier.clone(),
            url: settings.url.clone(),
            max_connections: settings.max_connections,
            dialect,
            is_default: settings.default,
        })
    }
}

/// A registered backend: descriptor plus its open pool.
///
/// The pool doubles as the transaction-boundary factory: repositories call
/// `pool().begin()` to open a unit of work scoped to this backend only.
#[derive(Debug)]
pub struct Backend {
    descriptor: BackendDescriptor,
    pool: AnyPool,
}

impl Backend {
    pub fn identifier(&self) -> &str {
        &self.descriptor.identifier
    }

    pub fn dialect(&self) -> Dialect {
        self.descriptor.dialect
    }

    pub fn descriptor(&self) -> &BackendDescriptor {
        &self.descriptor
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("backend '{identifier}' is already registered")]
    DuplicateBackend { identifier: String },

    #[error("backend '{identifier}' is marked default but '{existing}' already is")]
    MultipleDefaults {
        identifier: String,
        existing: String,
    },

    #[error("unknown backend '{identifier}'")]
    UnknownBackend { identifier: String },

    #[error("no backend is marked as the default")]
    NoDefaultBackend,

    #[error("unsupported connection URL for backend '{identifier}' (expected postgres:// or sqlite:)")]
    UnsupportedUrl { identifier: String },

    #[error("backend '{identifier}' unreachable: {source}")]
    Unreachable {
        identifier: String,
        source: sqlx::Error,
    },
}

/// Process-wide mapping from backend identifier to open backend.
#[derive(Default)]
pub struct BackendRegistry {
    backends: HashMap<String, Backend>,
    default: Option<String>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend and open its pool eagerly.
    ///
    /// Fails fast: an unreachable database surfaces as
    /// `RegistryError::Unreachable` so startup aborts before any request is
    /// served. Registering a second backend under the same identifier, or a
    /// second default, is a configuration defect and fails likewise.
    pub async fn register(&mut self, descriptor: BackendDescriptor) -> Result<(), RegistryError> {
        if self.backends.contains_key(&descriptor.identifier) {
            return Err(RegistryError::DuplicateBackend {
                identifier: descriptor.identifier,
            });
        }

        if descriptor.is_default {
            if let Some(existing) = &self.default {
                return Err(RegistryError::MultipleDefaults {
                    identifier: descriptor.identifier,
                    existing: existing.clone(),
                });
            }
        }

        let pool = open_pool(&descriptor)
            .await
            .map_err(|source| RegistryError::Unreachable {
                identifier: descriptor.identifier.clone(),
                source,
            })?;

        tracing::info!(
            backend = %descriptor.identifier,
            dialect = descriptor.dialect.as_str(),
            max_connections = descriptor.max_connections,
            default = descriptor.is_default,
            "backend registered"
        );

        if descriptor.is_default {
            self.default = Some(descriptor.identifier.clone());
        }
        self.backends
            .insert(descriptor.identifier.clone(), Backend { descriptor, pool });

        Ok(())
    }

    pub fn get(&self, identifier: &str) -> Result<&Backend, RegistryError> {
        self.backends
            .get(identifier)
            .ok_or_else(|| RegistryError::UnknownBackend {
                identifier: identifier.to_string(),
            })
    }

    /// The backend used when no explicit routing is requested.
    pub fn default_backend(&self) -> Result<&Backend, RegistryError> {
        let identifier = self.default.as_ref().ok_or(RegistryError::NoDefaultBackend)?;
        self.get(identifier)
    }

    /// Registered identifiers, sorted for stable display.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.backends.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

/// Open the pool for a descriptor with its configured connection limit.
async fn open_pool(descriptor: &BackendDescriptor) -> Result<AnyPool, sqlx::Error> {
    install_drivers();

    AnyPoolOptions::new()
        .max_connections(descriptor.max_connections)
        .connect(&descriptor.url)
        .await
}

// sqlx's Any driver table must be installed exactly once per process.
static DRIVERS: Once = Once::new();

fn install_drivers() {
    DRIVERS.call_once(sqlx::any::install_default_drivers);
}
