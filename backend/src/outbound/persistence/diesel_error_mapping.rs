//! Diesel error mapping shared by the repository adapters.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error.
pub(crate) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    connection(error.into_message())
}

/// Map a failed Diesel operation into query or connection errors.
///
/// Raw database messages are logged at debug level and replaced by a short
/// description so table details do not leak into domain errors.
pub(crate) fn map_diesel_error<E>(
    error: DieselError,
    operation: &str,
    query: impl FnOnce(String) -> E,
    connection: impl FnOnce(String) -> E,
) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), %operation, "diesel operation failed");
        }
        other => debug!(error = %other, %operation, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection(format!("{operation}: database connection error"))
        }
        DieselError::NotFound => query(format!("{operation}: record not found")),
        DieselError::QueryBuilderError(_) => query(format!("{operation}: database query error")),
        _ => query(format!("{operation}: database error")),
    }
}

pub(crate) fn is_unique_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq)]
    enum Mapped {
        Query(String),
        Connection(String),
    }

    fn map(error: DieselError) -> Mapped {
        map_diesel_error(error, "count audits", Mapped::Query, Mapped::Connection)
    }

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new("relation t1_audit_data".to_owned()))
    }

    #[rstest]
    fn closed_connections_map_to_connection_errors() {
        assert_eq!(
            map(database_error(DatabaseErrorKind::ClosedConnection)),
            Mapped::Connection("count audits: database connection error".to_owned())
        );
    }

    #[rstest]
    #[case(DieselError::NotFound, "count audits: record not found")]
    #[case(database_error(DatabaseErrorKind::Unknown), "count audits: database error")]
    #[case(DieselError::RollbackTransaction, "count audits: database error")]
    fn other_failures_map_to_query_errors(#[case] error: DieselError, #[case] expected: &str) {
        assert_eq!(map(error), Mapped::Query(expected.to_owned()));
    }

    #[rstest]
    fn database_messages_are_not_forwarded() {
        let Mapped::Query(message) = map(database_error(DatabaseErrorKind::Unknown)) else {
            panic!("expected query error");
        };
        assert!(!message.contains("t1_audit_data"));
    }

    #[rstest]
    fn pool_errors_keep_their_message() {
        let mapped = map_pool_error(PoolError::checkout("timed out"), Mapped::Connection);
        assert_eq!(mapped, Mapped::Connection("timed out".to_owned()));
    }

    #[rstest]
    #[case(database_error(DatabaseErrorKind::UniqueViolation), true)]
    #[case(database_error(DatabaseErrorKind::ForeignKeyViolation), false)]
    #[case(DieselError::NotFound, false)]
    fn detects_unique_violations(#[case] error: DieselError, #[case] expected: bool) {
        assert_eq!(is_unique_violation(&error), expected);
    }
}
