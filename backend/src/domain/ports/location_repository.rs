//! Port for the per-user location assignment table.

use async_trait::async_trait;

use crate::domain::{LocationAssignment, LocationId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by location repository adapters.
    pub enum LocationRepositoryError {
        /// Repository connection could not be established.
        Connection { message } => "location repository connection failed: {message}",
        /// Query failed during execution.
        Query { message } => "location repository query failed: {message}",
    }
}

/// Read access to `user_accessible_locations`.
///
/// Assignments are keyed by the user's email exactly as stored in the session,
/// which is the value the users table returned at login.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Every assignment for the user, active or not.
    async fn list_for_user(
        &self,
        user_mail: &str,
    ) -> Result<Vec<LocationAssignment>, LocationRepositoryError>;

    /// The assignment for one location, or `None` when the user has no access.
    async fn find_for_user(
        &self,
        user_mail: &str,
        location_id: &LocationId,
    ) -> Result<Option<LocationAssignment>, LocationRepositoryError>;
}
