//! PostgreSQL adapters for the repository ports.
//!
//! Adapters only translate between Diesel rows and domain types; row structs
//! and table definitions stay private to this module. Connections come from a
//! `bb8` pool driven by `diesel-async`.
//!
//! ```ignore
//! use audit_backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/audits")).await?;
//! let users = DieselUserRepository::new(pool.clone());
//! ```

mod diesel_audit_repository;
mod diesel_checklist_repository;
mod diesel_error_mapping;
mod diesel_location_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_audit_repository::DieselAuditRepository;
pub use diesel_checklist_repository::DieselChecklistRepository;
pub use diesel_location_repository::DieselLocationRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
