//! Location browsing handlers.
//!
//! ```text
//! GET /api/v1/locations/L1
//! GET /api/v1/locations/L1/owners/Ops/descriptions
//! GET /api/v1/locations/L1/search?q=fire
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::domain::ports::LocationOverview;
use crate::domain::{ChecklistItem, Error, LocationId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Parse a location id from the path.
pub(crate) fn parse_location_id(raw: String) -> Result<LocationId, Error> {
    LocationId::new(raw).map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "locationId", "code": "invalid_location_id" }))
    })
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Case-insensitive fragment of an item description.
    #[serde(default)]
    pub q: String,
}

/// Owners with outstanding items at a location.
#[utoipa::path(
    get,
    path = "/api/v1/locations/{location_id}",
    params(("location_id" = String, Path, description = "Location identifier")),
    responses(
        (status = 200, description = "Owner tallies", body = LocationOverview),
        (status = 401, description = "No live session", body = Error),
        (status = 403, description = "Location not assigned to the user", body = Error)
    ),
    tags = ["locations"],
    operation_id = "locationOverview"
)]
#[get("/locations/{location_id}")]
pub async fn location_overview(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<LocationOverview>> {
    let auth = session.require_session(state.clock.utc())?;
    let location_id = parse_location_id(path.into_inner())?;
    let overview = state
        .locations
        .overview(auth.user().email(), &location_id)
        .await?;
    Ok(web::Json(overview))
}

/// Items an owner still has to have scored at a location.
#[utoipa::path(
    get,
    path = "/api/v1/locations/{location_id}/owners/{owner}/descriptions",
    params(
        ("location_id" = String, Path, description = "Location identifier"),
        ("owner" = String, Path, description = "Checklist owner")
    ),
    responses(
        (status = 200, description = "Incomplete items", body = [ChecklistItem]),
        (status = 401, description = "No live session", body = Error),
        (status = 403, description = "Location not assigned to the user", body = Error)
    ),
    tags = ["locations"],
    operation_id = "ownerDescriptions"
)]
#[get("/locations/{location_id}/owners/{owner}/descriptions")]
pub async fn owner_descriptions(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<Vec<ChecklistItem>>> {
    let auth = session.require_session(state.clock.utc())?;
    let (raw_id, owner) = path.into_inner();
    let location_id = parse_location_id(raw_id)?;
    let items = state
        .locations
        .descriptions(auth.user().email(), &location_id, &owner)
        .await?;
    Ok(web::Json(items))
}

/// Search incomplete items at a location by description.
#[utoipa::path(
    get,
    path = "/api/v1/locations/{location_id}/search",
    params(
        ("location_id" = String, Path, description = "Location identifier"),
        SearchQuery
    ),
    responses(
        (status = 200, description = "Matching incomplete items", body = [ChecklistItem]),
        (status = 401, description = "No live session", body = Error),
        (status = 403, description = "Location not assigned to the user", body = Error)
    ),
    tags = ["locations"],
    operation_id = "searchDescriptions"
)]
#[get("/locations/{location_id}/search")]
pub async fn search_descriptions(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<Vec<ChecklistItem>>> {
    let auth = session.require_session(state.clock.utc())?;
    let location_id = parse_location_id(path.into_inner())?;
    let items = state
        .locations
        .search(auth.user().email(), &location_id, &query.q)
        .await?;
    Ok(web::Json(items))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(search_descriptions)
        .service(owner_descriptions)
        .service(location_overview);
}
