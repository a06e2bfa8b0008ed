//! Login service implementing the [`LoginService`] driving port.
//!
//! Authentication is a lookup: email matched case-insensitively and password
//! compared exactly against the stored value. Success opens an
//! [`AuthSession`] stamped from the injected clock.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{LoginService, UserRepository};
use crate::domain::service_support::map_user_error;
use crate::domain::{AuthSession, EmailAddress, Error, LoginCredentials};

/// Repository-backed authenticator.
#[derive(Clone)]
pub struct UserLoginService<U> {
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U> UserLoginService<U> {
    /// Create the service; `clock` stamps session expiry.
    pub fn new(users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }
}

#[async_trait]
impl<U> LoginService for UserLoginService<U>
where
    U: UserRepository,
{
    async fn verify_email(&self, email: &EmailAddress) -> Result<bool, Error> {
        let found = self
            .users
            .find_by_email(email)
            .await
            .map_err(map_user_error)?;
        debug!(recognised = found.is_some(), "email verification");
        Ok(found.is_some())
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error> {
        let user = self
            .users
            .find_by_credentials(credentials)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("invalid credentials"))?;
        let session = AuthSession::start(user, self.clock.utc());
        info!(expires_at = %session.expires_at(), "user signed in");
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockUserRepository, UserPersistenceError};
    use crate::domain::{ErrorCode, SESSION_TTL, User};
    use crate::test_support::MutableClock;
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        Arc::new(MutableClock::new(
            Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0)
                .single()
                .expect("valid timestamp"),
        ))
    }

    fn service(
        repo: MockUserRepository,
        clock: Arc<MutableClock>,
    ) -> UserLoginService<MockUserRepository> {
        UserLoginService::new(Arc::new(repo), clock)
    }

    #[rstest]
    #[tokio::test]
    async fn authenticate_opens_four_hour_session(clock: Arc<MutableClock>) {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_credentials()
            .withf(|creds| creds.email().as_str() == "A@x.com" && creds.password() == "pw")
            .times(1)
            .return_once(|_| Ok(Some(User::new("a@x.com", "Ada", "Lovelace"))));
        let now = clock.utc();

        let creds = LoginCredentials::try_from_parts("A@x.com", "pw").expect("valid creds");
        let session = service(repo, clock)
            .authenticate(&creds)
            .await
            .expect("login succeeds");

        assert_eq!(session.user().email(), "a@x.com");
        assert_eq!(session.expires_at(), now + SESSION_TTL);
    }

    #[rstest]
    #[tokio::test]
    async fn authenticate_rejects_unknown_credentials(clock: Arc<MutableClock>) {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_credentials()
            .return_once(|_| Ok(None));

        let creds = LoginCredentials::try_from_parts("a@x.com", "nope").expect("valid creds");
        let err = service(repo, clock)
            .authenticate(&creds)
            .await
            .expect_err("unknown credentials fail");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "invalid credentials");
    }

    #[rstest]
    #[case(None, false)]
    #[case(Some(User::new("a@x.com", "Ada", "L")), true)]
    #[tokio::test]
    async fn verify_email_reports_presence(
        clock: Arc<MutableClock>,
        #[case] stored: Option<User>,
        #[case] expected: bool,
    ) {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().return_once(move |_| Ok(stored));

        let email = EmailAddress::parse("a@x.com").expect("valid email");
        let recognised = service(repo, clock)
            .verify_email(&email)
            .await
            .expect("lookup succeeds");
        assert_eq!(recognised, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn connection_failures_surface_as_unavailable(clock: Arc<MutableClock>) {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .return_once(|_| Err(UserPersistenceError::connection("refused")));

        let email = EmailAddress::parse("a@x.com").expect("valid email");
        let err = service(repo, clock)
            .verify_email(&email)
            .await
            .expect_err("lookup fails");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
