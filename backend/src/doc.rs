//! OpenAPI documentation for the REST API.
//!
//! Served through Swagger UI in debug builds. The document carries the
//! session cookie security scheme so authenticated endpoints can be tried
//! from the browser after logging in.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::{LocationOverview, SubmissionOutcome, TaskForScoring};
use crate::domain::{
    AuthSession, ChecklistItem, Error, ErrorCode, GuardDecision, GuardState, LastRoute,
    LocationStatus, LocationSummary, OwnerTally, Redirect, ScoreDto, User,
};
use crate::inbound::http::auth::{
    LoginRequest, LoginResponse, RedirectResponse, SaveRouteRequest, SaveRouteResponse,
    SessionResponse, VerifyEmailRequest, VerifyEmailResponse,
};
use crate::inbound::http::navigation::NavigationResponse;
use crate::inbound::http::scoreboard::{SubmitAuditRequest, SubmitAuditResponse};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login; expires four hours after login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Location audit API",
        description = "Session-authenticated access to assigned locations, checklists, and audit submission."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::verify_email,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_session,
        crate::inbound::http::auth::save_route,
        crate::inbound::http::navigation::navigate,
        crate::inbound::http::dashboard::list_locations,
        crate::inbound::http::locations::location_overview,
        crate::inbound::http::locations::owner_descriptions,
        crate::inbound::http::locations::search_descriptions,
        crate::inbound::http::scoreboard::prepare_task,
        crate::inbound::http::scoreboard::submit_audit,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        AuthSession,
        LastRoute,
        Redirect,
        GuardState,
        GuardDecision,
        LocationStatus,
        LocationSummary,
        OwnerTally,
        ChecklistItem,
        ScoreDto,
        LocationOverview,
        TaskForScoring,
        SubmissionOutcome,
        VerifyEmailRequest,
        VerifyEmailResponse,
        LoginRequest,
        LoginResponse,
        SessionResponse,
        RedirectResponse,
        SaveRouteRequest,
        SaveRouteResponse,
        NavigationResponse,
        SubmitAuditRequest,
        SubmitAuditResponse,
    )),
    tags(
        (name = "auth", description = "Login, logout, and session state"),
        (name = "navigation", description = "Route guard decisions"),
        (name = "locations", description = "Assigned locations and their checklists"),
        (name = "audits", description = "Scoring and submitting checklist items"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn schema(name: &str) -> RefOr<Schema> {
        let doc = ApiDoc::openapi();
        doc.components
            .expect("components")
            .schemas
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("schema {name} registered"))
    }

    fn assert_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => assert!(
                obj.properties.contains_key(field),
                "schema should have field '{field}'"
            ),
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("Error", "code")]
    #[case("Error", "message")]
    #[case("User", "email")]
    #[case("LocationSummary", "completedTasks")]
    #[case("SubmitAuditRequest", "uniqueId")]
    fn schemas_expose_wire_field_names(#[case] name: &str, #[case] field: &str) {
        assert_has_field(&schema(name), field);
    }

    #[rstest]
    #[case("/api/v1/login")]
    #[case("/api/v1/session/route")]
    #[case("/api/v1/locations/{location_id}/audits")]
    #[case("/health/ready")]
    fn every_endpoint_is_documented(#[case] path: &str) {
        assert!(ApiDoc::openapi().paths.paths.contains_key(path), "{path}");
    }

    #[test]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
