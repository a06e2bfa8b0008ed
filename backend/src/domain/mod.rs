//! Domain primitives, aggregates, and services.
//!
//! Purpose: model sessions, location assignments, checklist items, and audit
//! records with validated types, and implement the driving ports the HTTP
//! adapter calls. Nothing here depends on Actix or Diesel.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - AuthSession / LastRoute / Redirect: session state kept in the cookie.
//! - Route / GuardDecision / `decide`: client route guard.
//! - LocationSummary / LocationStatus: dashboard aggregation.
//! - AuditSubmission / Score / NewAuditRecord: scoring workflow.
//! - Services: [`UserLoginService`], [`DashboardService`],
//!   [`LocationService`], [`AuditService`].

pub mod audit;
pub mod audit_service;
pub mod auth;
pub mod checklist;
pub mod dashboard_service;
pub mod error;
pub mod location;
pub mod location_service;
pub mod login_service;
pub mod month;
pub mod owners;
pub mod ports;
pub mod route_guard;
pub mod search;
mod service_support;
pub mod session;
pub mod trace_id;
pub mod user;

pub use self::audit::{
    AuditSubmission, AuditValidationError, NewAuditRecord, PointId, Score, ScoreDto,
};
pub use self::audit_service::AuditService;
pub use self::auth::{EmailAddress, LoginCredentials, LoginValidationError};
pub use self::checklist::ChecklistItem;
pub use self::dashboard_service::DashboardService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::location::{
    BusinessLine, LocationAssignment, LocationId, LocationStatus, LocationSummary,
    LocationValidationError,
};
pub use self::location_service::LocationService;
pub use self::login_service::UserLoginService;
pub use self::month::{AssignedMonth, is_assignment_active};
pub use self::owners::{OwnerTally, incomplete_items, tally_owners};
pub use self::route_guard::{GuardDecision, GuardState, Route, decide};
pub use self::search::filter_descriptions;
pub use self::session::{
    AUTH_SESSION_KEY, AuthSession, LAST_ROUTE_KEY, LastRoute, Redirect, SESSION_TTL,
};
pub use self::trace_id::TraceId;
pub use self::user::User;
