//! clinica-server: HTTP service over independently routed record backends
//!
//! Doctors and patients live in two separate relational databases. Each
//! record type is bound to exactly one backend when the server wires up;
//! every mutating operation runs inside a transaction scoped to that one
//! backend. There is no cross-backend coordination and no retry logic.

pub mod db;
pub mod http;
pub mod services;

pub use http::{run_server, AppState, ServerConfig};
