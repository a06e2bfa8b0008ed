//! Signed-in session state and the last visited route.
//!
//! A session lives for [`SESSION_TTL`] from the moment the user logs in and is
//! never refreshed. Both values are JSON-encoded into the session cookie by the
//! HTTP adapter under [`AUTH_SESSION_KEY`] and [`LAST_ROUTE_KEY`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::User;

/// Lifetime of a session measured from login.
pub const SESSION_TTL: Duration = Duration::hours(4);

/// Session cookie key holding the serialised [`AuthSession`].
pub const AUTH_SESSION_KEY: &str = "auth_session";

/// Session cookie key holding the serialised [`LastRoute`].
pub const LAST_ROUTE_KEY: &str = "last_route_state";

/// Authenticated user together with the session expiry.
///
/// # Examples
/// ```
/// use audit_backend::domain::{AuthSession, User, SESSION_TTL};
/// use chrono::{TimeZone, Utc};
///
/// let now = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
/// let session = AuthSession::start(User::new("a@x.com", "Ada", "L"), now);
/// assert!(!session.is_expired(now + SESSION_TTL - chrono::Duration::seconds(1)));
/// assert!(session.is_expired(now + SESSION_TTL));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    user: User,
    expires_at: DateTime<Utc>,
}

impl AuthSession {
    /// Open a session at `now` that expires after [`SESSION_TTL`].
    pub fn start(user: User, now: DateTime<Utc>) -> Self {
        Self {
            user,
            expires_at: now + SESSION_TTL,
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Login time plus [`SESSION_TTL`].
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// A session is valid strictly before its expiry instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Route the user last visited while signed in, restored after the next login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LastRoute {
    #[schema(example = "/location/L1")]
    pathname: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    state: Value,
    #[serde(default)]
    #[schema(example = "?q=fire")]
    search: String,
}

impl LastRoute {
    /// Build a route, returning `None` for paths that must not be restored.
    ///
    /// The root path and any path mentioning `login` (in any casing) are
    /// excluded so a restored login never lands back on the login page.
    pub fn remember(
        pathname: impl Into<String>,
        state: Value,
        search: impl Into<String>,
    ) -> Option<Self> {
        let pathname = pathname.into();
        if !Self::is_restorable(&pathname) {
            return None;
        }
        Some(Self {
            pathname,
            state,
            search: search.into(),
        })
    }

    /// Whether `pathname` may be saved as a last route.
    pub fn is_restorable(pathname: &str) -> bool {
        let trimmed = pathname.trim();
        !trimmed.is_empty() && trimmed != "/" && !trimmed.to_lowercase().contains("login")
    }

    pub fn pathname(&self) -> &str {
        self.pathname.as_str()
    }

    pub fn state(&self) -> &Value {
        &self.state
    }

    pub fn search(&self) -> &str {
        self.search.as_str()
    }
}

/// Navigation target handed back to clients after login, logout, or a submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Redirect {
    #[schema(example = "/dashboard")]
    pathname: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    #[schema(value_type = Object)]
    state: Value,
}

impl Redirect {
    /// Redirect without client state.
    pub fn to(pathname: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            state: Value::Null,
        }
    }

    pub fn with_state(mut self, state: Value) -> Self {
        self.state = state;
        self
    }

    /// Redirect after login: the saved route when present, else the dashboard.
    pub fn after_login(saved: Option<&LastRoute>) -> Self {
        match saved {
            Some(route) => Self::to(route.pathname()).with_state(route.state().clone()),
            None => Self::to("/dashboard").with_state(serde_json::json!({ "fromLogin": true })),
        }
    }

    pub fn pathname(&self) -> &str {
        self.pathname.as_str()
    }

    pub fn state(&self) -> &Value {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn login_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[fixture]
    fn session(login_time: DateTime<Utc>) -> AuthSession {
        AuthSession::start(User::new("a@x.com", "Ada", "Lovelace"), login_time)
    }

    #[rstest]
    fn expiry_is_four_hours_after_login(session: AuthSession, login_time: DateTime<Utc>) {
        assert_eq!(session.expires_at(), login_time + Duration::hours(4));
    }

    #[rstest]
    #[case(Duration::zero(), false)]
    #[case(Duration::minutes(239), false)]
    #[case(Duration::hours(4), true)]
    #[case(Duration::hours(5), true)]
    fn expiry_boundary(
        session: AuthSession,
        login_time: DateTime<Utc>,
        #[case] elapsed: Duration,
        #[case] expired: bool,
    ) {
        assert_eq!(session.is_expired(login_time + elapsed), expired);
    }

    #[rstest]
    fn session_serialises_iso_expiry(session: AuthSession) {
        let value = serde_json::to_value(&session).expect("serialise session");
        assert_eq!(value["expiresAt"], json!("2025-03-01T12:00:00Z"));
        assert_eq!(value["user"]["email"], json!("a@x.com"));
    }

    #[rstest]
    #[case("/", false)]
    #[case("", false)]
    #[case("/login", false)]
    #[case("/Login", false)]
    #[case("/relogin-help", false)]
    #[case("/dashboard", true)]
    #[case("/location/L1", true)]
    fn restorable_paths(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(LastRoute::is_restorable(path), expected);
        assert_eq!(
            LastRoute::remember(path, Value::Null, "").is_some(),
            expected
        );
    }

    #[rstest]
    fn redirect_after_login_defaults_to_dashboard() {
        let redirect = Redirect::after_login(None);
        assert_eq!(redirect.pathname(), "/dashboard");
        assert_eq!(redirect.state(), &json!({ "fromLogin": true }));
    }

    #[rstest]
    fn redirect_after_login_restores_saved_route() {
        let state = json!({ "returnState": { "selectedOwner": "Ops" } });
        let route = LastRoute::remember("/location/L1", state.clone(), "?tab=1")
            .expect("restorable route");
        let redirect = Redirect::after_login(Some(&route));
        assert_eq!(redirect.pathname(), "/location/L1");
        assert_eq!(redirect.state(), &state);
    }
}
