//! Service layer - thin orchestration over the repositories
//!
//! Each service holds the repository for its record type, already bound to
//! the right backend at wiring time. Services add nothing beyond delegation:
//! no retries, no cross-backend fan-out; repository errors propagate to the
//! HTTP layer unchanged.

pub mod doctors;
pub mod patients;

pub use doctors::DoctorService;
pub use patients::PatientService;
