//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix cookie session so handlers deal only with the
//! [`AuthSession`] and [`LastRoute`] values stored under
//! [`AUTH_SESSION_KEY`] and [`LAST_ROUTE_KEY`].

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use chrono::{DateTime, Utc};
use futures_util::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::{AUTH_SESSION_KEY, AuthSession, Error, LAST_ROUTE_KEY, LastRoute};

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated session in the cookie.
    pub fn persist_session(&self, session: &AuthSession) -> Result<(), Error> {
        self.0
            .insert(AUTH_SESSION_KEY, session)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Read a stored value, treating undecodable entries as absent.
    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.0.get::<T>(key) {
            Ok(value) => value,
            Err(error) => {
                warn!(key, %error, "discarding unreadable session entry");
                self.0.remove(key);
                None
            }
        }
    }

    /// The stored session if present and not expired at `now`.
    ///
    /// An expired session is dropped together with the saved route. Keys are
    /// removed, not purged: a purged session ignores later inserts.
    pub fn current_session(&self, now: DateTime<Utc>) -> Option<AuthSession> {
        let session = self.read::<AuthSession>(AUTH_SESSION_KEY)?;
        if self.expire_if_lapsed(&session, now) {
            return None;
        }
        Some(session)
    }

    /// Forget a lapsed session and its saved route; a live one is untouched.
    pub fn drop_if_expired(&self, now: DateTime<Utc>) {
        if let Some(session) = self.read::<AuthSession>(AUTH_SESSION_KEY) {
            self.expire_if_lapsed(&session, now);
        }
    }

    fn expire_if_lapsed(&self, session: &AuthSession, now: DateTime<Utc>) -> bool {
        if !session.is_expired(now) {
            return false;
        }
        debug!(expires_at = %session.expires_at(), "session expired");
        self.0.remove(AUTH_SESSION_KEY);
        self.0.remove(LAST_ROUTE_KEY);
        true
    }

    /// Require a live session or return `401 Unauthorized`.
    pub fn require_session(&self, now: DateTime<Utc>) -> Result<AuthSession, Error> {
        self.current_session(now)
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Remember the last visited route.
    pub fn save_route(&self, route: &LastRoute) -> Result<(), Error> {
        self.0
            .insert(LAST_ROUTE_KEY, route)
            .map_err(|error| Error::internal(format!("failed to persist route: {error}")))
    }

    /// The last saved route, if any.
    pub fn last_route(&self) -> Option<LastRoute> {
        self.read::<LastRoute>(LAST_ROUTE_KEY)
    }

    /// Drop the session and the saved route.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
