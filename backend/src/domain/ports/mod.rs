//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters: the
//! Diesel-backed store and the in-memory store. Driving ports (`LoginService`,
//! `DashboardQuery`, `LocationQuery`, `AuditCommand`) are implemented by the
//! domain services and called from inbound HTTP handlers.

mod macros;
pub(crate) use macros::define_port_error;

mod audit_command;
mod audit_repository;
mod checklist_repository;
mod dashboard_query;
mod location_query;
mod location_repository;
mod login_service;
mod user_repository;

#[cfg(test)]
pub use audit_command::MockAuditCommand;
pub use audit_command::{AuditCommand, SubmissionOutcome, TaskForScoring};
#[cfg(test)]
pub use audit_repository::MockAuditRepository;
pub use audit_repository::{AuditRepository, AuditRepositoryError};
#[cfg(test)]
pub use checklist_repository::MockChecklistRepository;
pub use checklist_repository::{ChecklistRepository, ChecklistRepositoryError};
pub use dashboard_query::DashboardQuery;
#[cfg(test)]
pub use dashboard_query::MockDashboardQuery;
pub use location_query::{LocationOverview, LocationQuery};
#[cfg(test)]
pub use location_query::MockLocationQuery;
#[cfg(test)]
pub use location_repository::MockLocationRepository;
pub use location_repository::{LocationRepository, LocationRepositoryError};
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
