//! Driving port for login use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! check an email or authenticate credentials without knowing the backing
//! infrastructure, so handler tests can substitute a double.

use async_trait::async_trait;

use crate::domain::{AuthSession, EmailAddress, Error, LoginCredentials};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// First login step: whether any user is registered under `email`.
    async fn verify_email(&self, email: &EmailAddress) -> Result<bool, Error>;

    /// Validate credentials and open a session for the matching user.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error>;
}
