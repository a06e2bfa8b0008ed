//! Location audit service library.
//!
//! Layers follow a hexagonal layout: `domain` holds the model, services, and
//! ports; `inbound::http` adapts Actix requests onto the driving ports; and
//! `outbound` implements the repository ports over PostgreSQL or memory.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
