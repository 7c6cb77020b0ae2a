//! Database layer - backend registry, record routing, repositories
//!
//! # Design Principles
//!
//! - One pool per backend; pool handles are never shared across backends
//! - Registry and router are wired once at startup, read-only afterwards
//! - Every mutating operation is transactional against exactly one backend
//! - Per-request failures surface to the caller unchanged; nothing retries

pub mod registry;
pub mod repos;
pub mod router;
pub mod schema;

pub use registry::{Backend, BackendDescriptor, BackendRegistry, Dialect, RegistryError};
pub use repos::{DoctorRepo, PatientRepo, RepoError};
pub use router::{RecordRouter, RoutingError};
