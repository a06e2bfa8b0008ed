//! Port for the shared checklist table.

use async_trait::async_trait;

use crate::domain::{BusinessLine, ChecklistItem};

use super::define_port_error;

define_port_error! {
    /// Errors raised by checklist repository adapters.
    pub enum ChecklistRepositoryError {
        /// Repository connection could not be established.
        Connection { message } => "checklist repository connection failed: {message}",
        /// Query failed during execution.
        Query { message } => "checklist repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChecklistRepository: Send + Sync {
    /// Number of checklist items for the business line.
    async fn count_for_business_line(
        &self,
        business_line: &BusinessLine,
    ) -> Result<u64, ChecklistRepositoryError>;

    /// Every checklist item for the business line.
    async fn list_for_business_line(
        &self,
        business_line: &BusinessLine,
    ) -> Result<Vec<ChecklistItem>, ChecklistRepositoryError>;

    /// Items owned by `owner` within the business line.
    async fn list_for_owner(
        &self,
        business_line: &BusinessLine,
        owner: &str,
    ) -> Result<Vec<ChecklistItem>, ChecklistRepositoryError>;

    /// One item identified by id, owner, and business line.
    async fn find_item(
        &self,
        business_line: &BusinessLine,
        owner: &str,
        unique_id: &str,
    ) -> Result<Option<ChecklistItem>, ChecklistRepositoryError>;
}
