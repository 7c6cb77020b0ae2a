//! Record-type to backend routing
//!
//! Every record type is bound to exactly one backend identifier. Bindings
//! come from configuration and are established once while wiring; the table
//! is read-only afterwards, so concurrent lookups need no locking. A lookup
//! that misses is a wiring defect, not a per-request condition: startup
//! resolves every record type before the server accepts traffic.

use std::collections::HashMap;

use thiserror::Error;

use clinica_core::records::RecordType;

use super::registry::BackendRegistry;

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("cannot bind record type '{record}': unknown backend '{identifier}'")]
    UnknownBackend {
        record: RecordType,
        identifier: String,
    },

    #[error("no backend bound for record type '{record}'")]
    UnboundRecordType { record: RecordType },
}

/// Static association between record types and backend identifiers.
#[derive(Debug, Default)]
pub struct RecordRouter {
    bindings: HashMap<RecordType, String>,
}

impl RecordRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a record type to a registered backend.
    ///
    /// The identifier must already be present in the registry; binding to an
    /// unknown backend is a wiring defect surfaced immediately.
    pub fn bind(
        &mut self,
        record: RecordType,
        registry: &BackendRegistry,
        identifier: &str,
    ) -> Result<(), RoutingError> {
        if registry.get(identifier).is_err() {
            return Err(RoutingError::UnknownBackend {
                record,
                identifier: identifier.to_string(),
            });
        }

        tracing::info!(record = %record, backend = identifier, "record type bound");
        self.bindings.insert(record, identifier.to_string());
        Ok(())
    }

    /// Resolve the backend identifier a record type is bound to.
    pub fn resolve(&self, record: RecordType) -> Result<&str, RoutingError> {
        self.bindings
            .get(&record)
            .map(String::as_str)
            .ok_or(RoutingError::UnboundRecordType { record })
    }
}
