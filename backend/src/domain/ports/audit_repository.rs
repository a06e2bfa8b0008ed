//! Port for the per-business-line audit tables.
//!
//! Each business line writes to its own `<line>_audit_data` table; adapters
//! derive the table from [`BusinessLine::audit_table`].

use std::collections::HashSet;

use async_trait::async_trait;

use crate::domain::{BusinessLine, LocationId, NewAuditRecord};

use super::define_port_error;

define_port_error! {
    /// Errors raised by audit repository adapters.
    pub enum AuditRepositoryError {
        /// Repository connection could not be established.
        Connection { message } => "audit repository connection failed: {message}",
        /// Query or insert failed during execution.
        Query { message } => "audit repository query failed: {message}",
        /// The store rejected a second record for the same item and location.
        Duplicate { unique_id } => "audit already recorded for item {unique_id}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Number of audit rows recorded for the location.
    async fn count_for_location(
        &self,
        business_line: &BusinessLine,
        location_id: &LocationId,
    ) -> Result<u64, AuditRepositoryError>;

    /// Checklist ids with at least one audit row for the location.
    async fn completed_ids(
        &self,
        business_line: &BusinessLine,
        location_id: &LocationId,
    ) -> Result<HashSet<String>, AuditRepositoryError>;

    /// Number of rows already recorded for one item at the location.
    async fn count_for_item(
        &self,
        business_line: &BusinessLine,
        location_id: &LocationId,
        unique_id: &str,
    ) -> Result<u64, AuditRepositoryError>;

    /// Persist one audit row.
    async fn insert(&self, record: &NewAuditRecord) -> Result<(), AuditRepositoryError>;
}
