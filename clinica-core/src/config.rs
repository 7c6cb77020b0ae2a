//! Startup configuration for the clinica service
//!
//! Configuration is loaded once at process startup from a TOML file and is
//! immutable afterwards. Each `[[backends]]` entry describes one relational
//! database: its connection URL, pool size, whether it is the process-wide
//! default, and which record types it serves. Exactly one backend must be
//! marked default and every record type must be served by exactly one
//! backend; both are checked at load time so a bad deployment fails before
//! any pool is opened.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::records::RecordType;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Top-level configuration for the service.
#[derive(Debug, Clone, Deserialize)]
pub struct ClinicaConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub backends: Vec<BackendSettings>,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3400))
}

/// One relational backend as named in configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendSettings {
    /// Unique name for this backend, e.g. "records-a".
    pub identifier: String,

    /// Connection URL; the scheme selects the dialect.
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Marks the backend used when no explicit routing is requested.
    /// Exactly one backend must set this.
    #[serde(default)]
    pub default: bool,

    /// Record types persisted in this backend.
    #[serde(default)]
    pub records: Vec<RecordType>,
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

impl ClinicaConfig {
    /// Load config from `$CLINICA_CONFIG` or `~/.clinica/config.toml`.
    ///
    /// Fails hard with an actionable error if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            anyhow::bail!(
                "Config not found at {:?}\n\nRun: clinica config init",
                config_path
            );
        }

        Self::load_from(&config_path)
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {:?}", path))?;

        let mut config: Self =
            toml::from_str(&content).context("Failed to parse config file (invalid TOML)")?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Get config file path: `$CLINICA_CONFIG` or `~/.clinica/config.toml`.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = env::var("CLINICA_CONFIG") {
            return PathBuf::from(path);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".clinica/config.toml")
    }

    /// Apply `CLINICA_BACKEND_<IDENTIFIER>_URL` overrides, so deployments can
    /// keep credentials out of the config file.
    fn apply_env_overrides(&mut self) {
        for backend in &mut self.backends {
            let key = format!(
                "CLINICA_BACKEND_{}_URL",
                backend.identifier.to_uppercase().replace('-', "_")
            );
            if let Ok(url) = env::var(&key) {
                tracing::debug!(backend = %backend.identifier, %key, "backend URL overridden from environment");
                backend.url = url;
            }
        }
    }

    /// Enforce the wiring invariants before any pool is opened.
    pub fn validate(&self) -> Result<()> {
        if self.backends.is_empty() {
            anyhow::bail!("No backends configured");
        }

        let mut seen = HashSet::new();
        for backend in &self.backends {
            if !seen.insert(backend.identifier.as_str()) {
                anyhow::bail!("Duplicate backend identifier '{}'", backend.identifier);
            }
        }

        let defaults: Vec<&str> = self
            .backends
            .iter()
            .filter(|b| b.default)
            .map(|b| b.identifier.as_str())
            .collect();
        match defaults.len() {
            0 => anyhow::bail!("No backend is marked as the default"),
            1 => {}
            _ => anyhow::bail!(
                "Multiple backends marked as default: {}",
                defaults.join(", ")
            ),
        }

        for record in RecordType::ALL {
            let bindings: Vec<&str> = self
                .backends
                .iter()
                .filter(|b| b.records.contains(&record))
                .map(|b| b.identifier.as_str())
                .collect();
            match bindings.len() {
                0 => anyhow::bail!("No backend serves record type '{}'", record),
                1 => {}
                _ => anyhow::bail!(
                    "Record type '{}' is served by more than one backend: {}",
                    record,
                    bindings.join(", ")
                ),
            }
        }

        Ok(())
    }
}
