//! Authentication and session handlers.
//!
//! ```text
//! POST /api/v1/login/verify-email {"email":"a@x.com"}
//! POST /api/v1/login {"email":"a@x.com","password":"secret"}
//! POST /api/v1/logout
//! GET  /api/v1/session
//! PUT  /api/v1/session/route {"pathname":"/location/L1","state":{}}
//! ```

use actix_web::{get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{
    EmailAddress, Error, LastRoute, LoginCredentials, LoginValidationError, Redirect, User,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request body for the first login step.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailRequest {
    #[schema(example = "auditor@example.com")]
    pub email: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailResponse {
    pub recognised: bool,
}

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// The signed-in user and when their session lapses.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: User,
    pub expires_at: DateTime<Utc>,
    /// Where the client should navigate next.
    pub redirect: Redirect,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedirectResponse {
    pub redirect: Redirect,
}

/// Route the client is currently showing.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveRouteRequest {
    pub pathname: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub state: Value,
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveRouteResponse {
    /// False when the path is never restored (root or login pages).
    pub saved: bool,
}

pub(crate) fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => Error::invalid_request("email must not be empty")
            .with_details(json!({ "field": "email", "code": "empty_email" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Check whether an email belongs to a known user.
#[utoipa::path(
    post,
    path = "/api/v1/login/verify-email",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Lookup result", body = VerifyEmailResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "User store unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "verifyEmail",
    security([])
)]
#[post("/login/verify-email")]
pub async fn verify_email(
    state: web::Data<HttpState>,
    payload: web::Json<VerifyEmailRequest>,
) -> ApiResult<web::Json<VerifyEmailResponse>> {
    let email = EmailAddress::parse(&payload.email).map_err(map_login_validation_error)?;
    let recognised = state.login.verify_email(&email).await?;
    Ok(web::Json(VerifyEmailResponse { recognised }))
}

/// Authenticate and open a four-hour session.
///
/// The response names the page to open next: the route saved during a
/// still-live session, or the dashboard. A lapsed session is purged first.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "User store unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let auth = state.login.authenticate(&credentials).await?;
    session.drop_if_expired(state.clock.utc());
    session.persist_session(&auth)?;
    let redirect = Redirect::after_login(session.last_route().as_ref());
    Ok(web::Json(LoginResponse {
        user: auth.user().clone(),
        expires_at: auth.expires_at(),
        redirect,
    }))
}

/// Clear the session and saved route.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 200, description = "Signed out", body = RedirectResponse)),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> web::Json<RedirectResponse> {
    session.clear();
    web::Json(RedirectResponse {
        redirect: Redirect::to("/login"),
    })
}

/// Current session, or 401 when absent or expired.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Live session", body = SessionResponse),
        (status = 401, description = "No live session", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentSession"
)]
#[get("/session")]
pub async fn current_session(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SessionResponse>> {
    let auth = session.require_session(state.clock.utc())?;
    Ok(web::Json(SessionResponse {
        user: auth.user().clone(),
        expires_at: auth.expires_at(),
    }))
}

/// Remember the route the signed-in client is showing.
#[utoipa::path(
    put,
    path = "/api/v1/session/route",
    request_body = SaveRouteRequest,
    responses(
        (status = 200, description = "Route handled", body = SaveRouteResponse),
        (status = 401, description = "No live session", body = Error)
    ),
    tags = ["auth"],
    operation_id = "saveRoute"
)]
#[put("/session/route")]
pub async fn save_route(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SaveRouteRequest>,
) -> ApiResult<web::Json<SaveRouteResponse>> {
    session.require_session(state.clock.utc())?;
    let SaveRouteRequest {
        pathname,
        state: route_state,
        search,
    } = payload.into_inner();
    let Some(route) = LastRoute::remember(pathname, route_state, search) else {
        debug!("route not restorable; ignoring");
        return Ok(web::Json(SaveRouteResponse { saved: false }));
    };
    session.save_route(&route)?;
    Ok(web::Json(SaveRouteResponse { saved: true }))
}

/// Register the handlers on a scope or app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(verify_email)
        .service(login)
        .service(logout)
        .service(current_session)
        .service(save_route);
}

#[cfg(test)]
mod tests;
