//! Port abstraction for user lookups and their errors.
//!
//! Users are provisioned by an external process, so the port is read-only.
use async_trait::async_trait;

use crate::domain::{EmailAddress, LoginCredentials, User};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message } => "user repository connection failed: {message}",
        /// Query failed during execution.
        Query { message } => "user repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user whose email matches case-insensitively.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user whose email matches case-insensitively and whose stored
    /// password equals the supplied one exactly.
    async fn find_by_credentials(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<User>, UserPersistenceError>;
}
