//! Scoring handlers.
//!
//! ```text
//! GET  /api/v1/locations/L1/tasks/CHK-1?owner=Ops
//! POST /api/v1/locations/L1/audits {"uniqueId":"CHK-1","owner":"Ops","score":3,"remark":"door wedged"}
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{SubmissionOutcome, TaskForScoring};
use crate::domain::{
    AuditSubmission, AuditValidationError, Error, LocationId, Redirect, Score, ScoreDto,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::locations::parse_location_id;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct TaskQuery {
    /// Owner whose list the item was opened from.
    #[param(example = "Ops")]
    pub owner: String,
}

/// Score for one checklist item.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAuditRequest {
    #[schema(example = "CHK-1")]
    pub unique_id: String,
    #[schema(example = "Ops")]
    pub owner: String,
    pub score: ScoreDto,
    #[serde(default)]
    pub remark: String,
}

impl TryFrom<SubmitAuditRequest> for AuditSubmission {
    type Error = AuditValidationError;

    fn try_from(value: SubmitAuditRequest) -> Result<Self, Self::Error> {
        let score = Score::try_from(value.score)?;
        Self::try_new(&value.unique_id, &value.owner, score, &value.remark)
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAuditResponse {
    #[serde(flatten)]
    pub outcome: SubmissionOutcome,
    pub redirect: Redirect,
}

fn map_audit_validation_error(err: AuditValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": err.field(), "code": err.code() }))
}

/// Client navigation after a recorded score.
///
/// Returning to the location restores the owner view and asks the client to
/// reload that owner's open items.
fn redirect_for(location_id: &LocationId, outcome: &SubmissionOutcome) -> Redirect {
    match outcome {
        SubmissionOutcome::LocationCompleted { .. } => Redirect::to("/dashboard"),
        SubmissionOutcome::ReturnToOwner {
            owner,
            business_line,
            ..
        } => Redirect::to(format!("/location/{location_id}")).with_state(json!({
            "returnState": {
                "selectedOwner": owner,
                "selectedBusinessLine": business_line.as_str(),
            },
            "refreshOwner": true,
        })),
    }
}

/// Open an unrecorded item for scoring.
#[utoipa::path(
    get,
    path = "/api/v1/locations/{location_id}/tasks/{unique_id}",
    params(
        ("location_id" = String, Path, description = "Location identifier"),
        ("unique_id" = String, Path, description = "Checklist item identifier"),
        TaskQuery
    ),
    responses(
        (status = 200, description = "Item ready for scoring", body = TaskForScoring),
        (status = 401, description = "No live session", body = Error),
        (status = 403, description = "Location not assigned to the user", body = Error),
        (status = 404, description = "No such item for the owner", body = Error),
        (status = 409, description = "Item already recorded", body = Error)
    ),
    tags = ["scoreboard"],
    operation_id = "prepareTask"
)]
#[get("/locations/{location_id}/tasks/{unique_id}")]
pub async fn prepare_task(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
    query: web::Query<TaskQuery>,
) -> ApiResult<web::Json<TaskForScoring>> {
    let auth = session.require_session(state.clock.utc())?;
    let (raw_id, unique_id) = path.into_inner();
    let location_id = parse_location_id(raw_id)?;
    let task = state
        .audits
        .prepare_task(auth.user().email(), &location_id, &unique_id, &query.owner)
        .await?;
    Ok(web::Json(task))
}

/// Record a score and tell the client where to go next.
#[utoipa::path(
    post,
    path = "/api/v1/locations/{location_id}/audits",
    params(("location_id" = String, Path, description = "Location identifier")),
    request_body = SubmitAuditRequest,
    responses(
        (status = 200, description = "Score recorded", body = SubmitAuditResponse),
        (status = 400, description = "Invalid submission", body = Error),
        (status = 401, description = "No live session", body = Error),
        (status = 403, description = "Location not assigned to the user", body = Error),
        (status = 409, description = "Item already recorded", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["scoreboard"],
    operation_id = "submitAudit"
)]
#[post("/locations/{location_id}/audits")]
pub async fn submit_audit(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<SubmitAuditRequest>,
) -> ApiResult<web::Json<SubmitAuditResponse>> {
    let auth = session.require_session(state.clock.utc())?;
    let location_id = parse_location_id(path.into_inner())?;
    let submission =
        AuditSubmission::try_from(payload.into_inner()).map_err(map_audit_validation_error)?;
    let outcome = state
        .audits
        .submit(auth.user(), &location_id, submission)
        .await?;
    let redirect = redirect_for(&location_id, &outcome);
    Ok(web::Json(SubmitAuditResponse { outcome, redirect }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(prepare_task).service(submit_audit);
}
