//! Tests for the login, logout, and session endpoints.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{
    MockAuditCommand, MockDashboardQuery, MockLocationQuery, MockLoginService,
};
use crate::domain::SESSION_TTL;
use crate::inbound::http::state::HttpStatePorts;
use crate::inbound::http::test_utils::{
    AUDITOR_EMAIL, AUDITOR_PASSWORD, Harness, login_and_get_cookie, session_cookie, test_app,
    test_now,
};
use crate::test_support::MutableClock;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;

#[derive(Debug)]
struct ValidationExpectation<'a> {
    message: &'a str,
    field: &'a str,
    code: &'a str,
}

async fn read_json(response: ServiceResponse) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("json payload")
}

fn state_with_login(login_service: MockLoginService) -> HttpState {
    HttpState::new(
        HttpStatePorts {
            login: Arc::new(login_service),
            dashboard: Arc::new(MockDashboardQuery::new()),
            locations: Arc::new(MockLocationQuery::new()),
            audits: Arc::new(MockAuditCommand::new()),
        },
        Arc::new(MutableClock::new(test_now())),
    )
}

#[rstest]
#[case(
    "   ",
    "secret",
    ValidationExpectation {
        message: "email must not be empty",
        field: "email",
        code: "empty_email",
    }
)]
#[case(
    "a@x.com",
    "",
    ValidationExpectation {
        message: "password must not be empty",
        field: "password",
        code: "empty_password",
    }
)]
#[actix_web::test]
async fn login_rejects_invalid_payloads(
    #[case] email: &str,
    #[case] password: &str,
    #[case] expected: ValidationExpectation<'_>,
) {
    let mut login_service = MockLoginService::new();
    login_service.expect_authenticate().never();
    let app = actix_test::init_service(test_app(state_with_login(login_service))).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(&LoginRequest {
            email: email.into(),
            password: password.into(),
        })
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let value = read_json(response).await;
    assert_eq!(
        value.get("message").and_then(Value::as_str),
        Some(expected.message)
    );
    assert_eq!(
        value.get("code").and_then(Value::as_str),
        Some("invalid_request")
    );
    let details = value.get("details").expect("details present");
    assert_eq!(
        details.get("field").and_then(Value::as_str),
        Some(expected.field)
    );
    assert_eq!(
        details.get("code").and_then(Value::as_str),
        Some(expected.code)
    );
}

#[rstest]
#[case(AUDITOR_EMAIL, true)]
#[case("AUDITOR@EXAMPLE.COM", true)]
#[case("stranger@example.com", false)]
#[actix_web::test]
async fn verify_email_reports_recognition(#[case] email: &str, #[case] recognised: bool) {
    let harness = Harness::seeded();
    let app = actix_test::init_service(test_app(harness.state)).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login/verify-email")
        .set_json(&VerifyEmailRequest {
            email: email.into(),
        })
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let value = read_json(response).await;
    assert_eq!(
        value.get("recognised").and_then(Value::as_bool),
        Some(recognised)
    );
}

#[actix_web::test]
async fn verify_email_surfaces_backend_outage() {
    let mut login_service = MockLoginService::new();
    login_service
        .expect_verify_email()
        .return_once(|_| Err(Error::service_unavailable("user store offline")));
    let app = actix_test::init_service(test_app(state_with_login(login_service))).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login/verify-email")
        .set_json(&VerifyEmailRequest {
            email: "a@x.com".into(),
        })
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn login_without_saved_route_redirects_to_dashboard() {
    let harness = Harness::seeded();
    let app = actix_test::init_service(test_app(harness.state)).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(&LoginRequest {
            email: "  AUDITOR@example.com ".into(),
            password: AUDITOR_PASSWORD.into(),
        })
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let value = read_json(response).await;

    assert_eq!(
        value.pointer("/redirect/pathname").and_then(Value::as_str),
        Some("/dashboard")
    );
    assert_eq!(
        value.pointer("/redirect/state/fromLogin").and_then(Value::as_bool),
        Some(true)
    );
    assert_eq!(
        value.pointer("/user/email").and_then(Value::as_str),
        Some(AUDITOR_EMAIL)
    );
    let expected_expiry = serde_json::to_value(test_now() + SESSION_TTL).expect("timestamp");
    assert_eq!(value.get("expiresAt"), Some(&expected_expiry));
}

#[actix_web::test]
async fn wrong_password_is_unauthorised() {
    let harness = Harness::seeded();
    let app = actix_test::init_service(test_app(harness.state)).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(&LoginRequest {
            email: AUDITOR_EMAIL.into(),
            password: "wrong".into(),
        })
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let value = read_json(response).await;
    assert_eq!(
        value.get("message").and_then(Value::as_str),
        Some("invalid credentials")
    );
}

#[actix_web::test]
async fn session_lapses_after_four_hours() {
    let harness = Harness::seeded();
    let clock = harness.clock.clone();
    let app = actix_test::init_service(test_app(harness.state)).await;
    let cookie = login_and_get_cookie(&app).await;

    clock.advance_seconds(SESSION_TTL.num_seconds() - 1);
    let live = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/session")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(live.status(), StatusCode::OK);

    clock.advance_seconds(1);
    let expired = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/session")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(expired.status(), StatusCode::UNAUTHORIZED);
    let value = read_json(expired).await;
    assert_eq!(
        value.get("code").and_then(Value::as_str),
        Some("unauthorized")
    );
}

async fn save_owner_route(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    cookie: Cookie<'static>,
) -> Cookie<'static> {
    let save = actix_test::call_service(
        app,
        actix_test::TestRequest::put()
            .uri("/api/v1/session/route")
            .cookie(cookie)
            .set_json(&SaveRouteRequest {
                pathname: "/location/L1".into(),
                state: json!({ "selectedOwner": "Ops" }),
                search: String::new(),
            })
            .to_request(),
    )
    .await;
    assert_eq!(save.status(), StatusCode::OK);
    session_cookie(&save)
}

async fn relogin(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    cookie: Cookie<'static>,
) -> Value {
    let response = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .cookie(cookie)
            .set_json(&LoginRequest {
                email: AUDITOR_EMAIL.into(),
                password: AUDITOR_PASSWORD.into(),
            })
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    read_json(response).await
}

#[actix_web::test]
async fn saved_route_is_restored_on_login_within_live_session() {
    let harness = Harness::seeded();
    let clock = harness.clock.clone();
    let app = actix_test::init_service(test_app(harness.state)).await;
    let cookie = login_and_get_cookie(&app).await;
    let cookie = save_owner_route(&app, cookie).await;

    clock.advance_hours(1);
    let value = relogin(&app, cookie).await;
    assert_eq!(
        value.pointer("/redirect/pathname").and_then(Value::as_str),
        Some("/location/L1")
    );
    assert_eq!(
        value
            .pointer("/redirect/state/selectedOwner")
            .and_then(Value::as_str),
        Some("Ops")
    );
}

#[actix_web::test]
async fn saved_route_is_purged_with_expired_session() {
    let harness = Harness::seeded();
    let clock = harness.clock.clone();
    let app = actix_test::init_service(test_app(harness.state)).await;
    let cookie = login_and_get_cookie(&app).await;
    let cookie = save_owner_route(&app, cookie).await;

    clock.advance_hours(5);
    let value = relogin(&app, cookie).await;
    assert_eq!(
        value.pointer("/redirect/pathname").and_then(Value::as_str),
        Some("/dashboard")
    );
    assert_eq!(
        value.pointer("/redirect/state/fromLogin").and_then(Value::as_bool),
        Some(true)
    );
}

#[rstest]
#[case("/", false)]
#[case("/Login", false)]
#[case("/scoreboard/L1", true)]
#[actix_web::test]
async fn save_route_skips_unrestorable_paths(#[case] pathname: &str, #[case] saved: bool) {
    let harness = Harness::seeded();
    let app = actix_test::init_service(test_app(harness.state)).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/session/route")
            .cookie(cookie)
            .set_json(&SaveRouteRequest {
                pathname: pathname.into(),
                state: Value::Null,
                search: String::new(),
            })
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let value = read_json(response).await;
    assert_eq!(value.get("saved").and_then(Value::as_bool), Some(saved));
}

#[actix_web::test]
async fn save_route_requires_session() {
    let harness = Harness::seeded();
    let app = actix_test::init_service(test_app(harness.state)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/session/route")
            .set_json(&SaveRouteRequest {
                pathname: "/dashboard".into(),
                state: Value::Null,
                search: String::new(),
            })
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn logout_clears_session_and_redirects_to_login() {
    let harness = Harness::seeded();
    let app = actix_test::init_service(test_app(harness.state)).await;
    let cookie = login_and_get_cookie(&app).await;

    let logout_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(logout_res.status(), StatusCode::OK);
    let cleared = session_cookie(&logout_res);
    assert!(cleared.value().is_empty(), "session cookie removed");
    let value = read_json(logout_res).await;
    assert_eq!(
        value.pointer("/redirect/pathname").and_then(Value::as_str),
        Some("/login")
    );
}
