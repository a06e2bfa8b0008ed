//! Route guard endpoint.
//!
//! ```text
//! GET /api/v1/navigation?path=/location/L1
//! ```
//!
//! The server always knows whether the cookie holds a live session, so the
//! `Loading` state never arises here; clients show a spinner while this call
//! is in flight.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{GuardDecision, GuardState, Route, decide};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct NavigationQuery {
    /// Client path to evaluate.
    #[param(example = "/dashboard")]
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NavigationResponse {
    pub state: GuardState,
    pub decision: GuardDecision,
}

/// Decide how the client should handle a path given the current session.
#[utoipa::path(
    get,
    path = "/api/v1/navigation",
    params(NavigationQuery),
    responses((status = 200, description = "Guard decision", body = NavigationResponse)),
    tags = ["navigation"],
    operation_id = "navigate",
    security([])
)]
#[get("/navigation")]
pub async fn navigate(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<NavigationQuery>,
) -> web::Json<NavigationResponse> {
    let guard_state = if session.current_session(state.clock.utc()).is_some() {
        GuardState::Authenticated
    } else {
        GuardState::Unauthenticated
    };
    let decision = decide(&Route::parse(&query.path), guard_state);
    web::Json(NavigationResponse {
        state: guard_state,
        decision,
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(navigate);
}
