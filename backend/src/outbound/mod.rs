//! Outbound adapters implementing the repository ports.
//!
//! - **persistence**: PostgreSQL tables through Diesel
//! - **memory**: process-local tables for development and tests

pub mod memory;
pub mod persistence;
