//! Route guard deciding what a client should do with a requested path.
//!
//! The guard is a pure function of the requested route and the resolved
//! authentication state; resolving that state from the session cookie is the
//! HTTP adapter's job.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Client routes known to the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Root,
    /// `/login`, matched case-insensitively.
    Login,
    /// `/dashboard`
    Dashboard,
    /// `/location/:id`
    Location(String),
    /// `/scoreboard/:id`
    Scoreboard(String),
    /// Anything else.
    Unknown,
}

impl Route {
    /// Classify a request path.
    ///
    /// # Examples
    /// ```
    /// use audit_backend::domain::Route;
    ///
    /// assert_eq!(Route::parse("/Login"), Route::Login);
    /// assert_eq!(Route::parse("/location/L1"), Route::Location("L1".into()));
    /// assert_eq!(Route::parse("/nowhere"), Route::Unknown);
    /// ```
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return Self::Root;
        }
        if trimmed.eq_ignore_ascii_case("/login") {
            return Self::Login;
        }

        let mut segments = trimmed.trim_start_matches('/').split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some("dashboard"), None, None) => Self::Dashboard,
            (Some("location"), Some(id), None) if !id.is_empty() => Self::Location(id.to_owned()),
            (Some("scoreboard"), Some(id), None) if !id.is_empty() => {
                Self::Scoreboard(id.to_owned())
            }
            _ => Self::Unknown,
        }
    }

    /// Routes that require an authenticated session.
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Self::Dashboard | Self::Location(_) | Self::Scoreboard(_)
        )
    }
}

/// Authentication state observed by the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum GuardState {
    /// Session has not been resolved yet.
    Loading,
    Unauthenticated,
    Authenticated,
}

/// What the client should do with the requested route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum GuardDecision {
    /// Show a loading indicator until the session resolves.
    Spinner,
    /// Render the requested page.
    Render,
    /// Navigate elsewhere, replacing the current history entry.
    Redirect {
        #[schema(example = "/login")]
        to: String,
    },
    /// No page exists for the path.
    NotFound,
}

impl GuardDecision {
    fn redirect(to: &str) -> Self {
        Self::Redirect { to: to.to_owned() }
    }
}

/// Decide how to handle `route` in `state`.
///
/// # Examples
/// ```
/// use audit_backend::domain::{decide, GuardDecision, GuardState, Route};
///
/// let decision = decide(&Route::Dashboard, GuardState::Unauthenticated);
/// assert_eq!(decision, GuardDecision::Redirect { to: "/login".into() });
/// ```
pub fn decide(route: &Route, state: GuardState) -> GuardDecision {
    match (route, state) {
        (Route::Unknown, _) => GuardDecision::NotFound,
        (_, GuardState::Loading) => GuardDecision::Spinner,
        (Route::Root | Route::Login, GuardState::Authenticated) => {
            GuardDecision::redirect("/dashboard")
        }
        (Route::Root, GuardState::Unauthenticated) => GuardDecision::redirect("/login"),
        (Route::Login, GuardState::Unauthenticated) => GuardDecision::Render,
        (_, GuardState::Unauthenticated) => GuardDecision::redirect("/login"),
        (_, GuardState::Authenticated) => GuardDecision::Render,
    }
}
