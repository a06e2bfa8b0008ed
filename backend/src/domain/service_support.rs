//! Repository error mapping and access checks shared by domain services.

use serde_json::json;
use tracing::debug;

use crate::domain::ports::{
    AuditRepositoryError, ChecklistRepositoryError, LocationRepository, LocationRepositoryError,
    UserPersistenceError,
};
use crate::domain::{Error, LocationAssignment, LocationId};

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

pub(crate) fn map_location_error(error: LocationRepositoryError) -> Error {
    match error {
        LocationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("location repository unavailable: {message}"))
        }
        LocationRepositoryError::Query { message } => {
            Error::internal(format!("location repository error: {message}"))
        }
    }
}

pub(crate) fn map_checklist_error(error: ChecklistRepositoryError) -> Error {
    match error {
        ChecklistRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("checklist repository unavailable: {message}"))
        }
        ChecklistRepositoryError::Query { message } => {
            Error::internal(format!("checklist repository error: {message}"))
        }
    }
}

pub(crate) fn map_audit_error(error: AuditRepositoryError) -> Error {
    match error {
        AuditRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("audit repository unavailable: {message}"))
        }
        AuditRepositoryError::Query { message } => {
            Error::internal(format!("audit repository error: {message}"))
        }
        AuditRepositoryError::Duplicate { unique_id } => already_audited(&unique_id),
    }
}

/// Conflict raised when an item already has a record at the location.
pub(crate) fn already_audited(unique_id: &str) -> Error {
    Error::conflict("this task has already been completed").with_details(json!({
        "uniqueId": unique_id,
        "code": "already_audited",
    }))
}

/// Resolve the user's assignment for a location or fail with `forbidden`.
pub(crate) async fn require_assignment<L>(
    locations: &L,
    user_mail: &str,
    location_id: &LocationId,
) -> Result<LocationAssignment, Error>
where
    L: LocationRepository + ?Sized,
{
    match locations
        .find_for_user(user_mail, location_id)
        .await
        .map_err(map_location_error)?
    {
        Some(assignment) => Ok(assignment),
        None => {
            debug!(location_id = %location_id, "location not accessible to user");
            Err(
                Error::forbidden("location not found or access denied").with_details(json!({
                    "locationId": location_id.as_str(),
                    "code": "location_inaccessible",
                })),
            )
        }
    }
}
