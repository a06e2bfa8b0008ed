//! Dashboard handler.
//!
//! ```text
//! GET /api/v1/locations
//! ```

use actix_web::{get, web};

use crate::domain::{Error, LocationSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Locations assigned to the signed-in user for the current month or later.
#[utoipa::path(
    get,
    path = "/api/v1/locations",
    responses(
        (status = 200, description = "Active locations", body = [LocationSummary]),
        (status = 401, description = "No live session", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["dashboard"],
    operation_id = "listLocations"
)]
#[get("/locations")]
pub async fn list_locations(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<LocationSummary>>> {
    let auth = session.require_session(state.clock.utc())?;
    let summaries = state.dashboard.active_locations(auth.user().email()).await?;
    Ok(web::Json(summaries))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_locations);
}
