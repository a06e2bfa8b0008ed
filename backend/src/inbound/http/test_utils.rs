//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use chrono::{DateTime, TimeZone, Utc};

use crate::domain::ports::{AuditRepository, ChecklistRepository, LocationRepository};
use crate::domain::{
    AuditService, AuditSubmission, BusinessLine, ChecklistItem, DashboardService,
    LocationAssignment, LocationId, LocationService, NewAuditRecord, PointId, Score, User,
    UserLoginService,
};
use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryAuditStore;
use crate::test_support::{MutableClock, month_label};

pub const AUDITOR_EMAIL: &str = "auditor@example.com";
pub const AUDITOR_PASSWORD: &str = "correct horse";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Fixed "now" used by HTTP tests.
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Store seeded with one auditor assigned to location `L1` (business line
/// `T1`) for the current month, with two `Ops` items and one `Finance` item.
pub fn seeded_store(now: DateTime<Utc>) -> Arc<InMemoryAuditStore> {
    let store = InMemoryAuditStore::with_unique_audits();
    store.add_user(User::new(AUDITOR_EMAIL, "Ada", "Lovelace"), AUDITOR_PASSWORD);
    let line = BusinessLine::new("T1").expect("valid business line");
    store.assign_location(
        AUDITOR_EMAIL,
        LocationAssignment {
            location_id: LocationId::new("L1").expect("valid location id"),
            location_name: "Main Street".into(),
            business_line: line.clone(),
            assigned_month: month_label(now),
        },
    );
    for (unique_id, owner, description, weightage) in [
        ("1", "Ops", "Fire exits are clear", Some(5)),
        ("2", "Ops", "Emergency lights work", Some(3)),
        ("3", "Finance", "Cash drawer reconciled", None),
    ] {
        store.add_checklist_item(ChecklistItem {
            unique_id: unique_id.into(),
            description: description.into(),
            impact: "High".into(),
            weightage,
            owner: owner.into(),
            department: format!("{owner} department"),
            business_line: line.clone(),
        });
    }
    Arc::new(store)
}

/// Wire real services over `store`, reading time from `clock`.
pub fn state_over(store: Arc<InMemoryAuditStore>, clock: Arc<MutableClock>) -> HttpState {
    let ports = HttpStatePorts {
        login: Arc::new(UserLoginService::new(store.clone(), clock.clone())),
        dashboard: Arc::new(DashboardService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            clock.clone(),
        )),
        locations: Arc::new(LocationService::new(
            store.clone(),
            store.clone(),
            store.clone(),
        )),
        audits: Arc::new(AuditService::new(
            store.clone(),
            store.clone(),
            store,
            clock.clone(),
        )),
    };
    HttpState::new(ports, clock)
}

/// Seeded store, its clock, and the state wired over both.
pub struct Harness {
    pub store: Arc<InMemoryAuditStore>,
    pub clock: Arc<MutableClock>,
    pub state: HttpState,
}

impl Harness {
    pub fn seeded() -> Self {
        let now = test_now();
        let store = seeded_store(now);
        let clock = Arc::new(MutableClock::new(now));
        let state = state_over(store.clone(), clock.clone());
        Self {
            store,
            clock,
            state,
        }
    }
}

/// The `session` cookie set on a response.
pub fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// App serving every API handler under `/api/v1` with `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(web::scope("/api/v1").configure(super::configure))
}

/// Sign in as the seeded auditor and return the session cookie.
pub async fn login_and_get_cookie(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
) -> Cookie<'static> {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(&LoginRequest {
            email: AUDITOR_EMAIL.into(),
            password: AUDITOR_PASSWORD.into(),
        })
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "login should succeed");
    session_cookie(&response)
}

/// Record a full-score audit for a seeded `L1` item directly in the store.
pub async fn record_audit(store: &InMemoryAuditStore, owner: &str, unique_id: &str) {
    let location = LocationId::new("L1").expect("valid id");
    let assignment = store
        .find_for_user(AUDITOR_EMAIL, &location)
        .await
        .expect("lookup")
        .expect("assigned");
    let item = store
        .find_item(&assignment.business_line, owner, unique_id)
        .await
        .expect("lookup")
        .expect("seeded item");
    let submission = AuditSubmission::try_new(unique_id, owner, Score::Five, "").expect("valid");
    let record = NewAuditRecord::assemble(
        PointId::generate(test_now(), &mut rand::thread_rng()),
        &assignment,
        &item,
        &submission,
        0,
        AUDITOR_EMAIL,
    );
    store.insert(&record).await.expect("insert");
}
