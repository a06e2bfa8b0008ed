//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{AuditCommand, DashboardQuery, LocationQuery, LoginService};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub dashboard: Arc<dyn DashboardQuery>,
    pub locations: Arc<dyn LocationQuery>,
    pub audits: Arc<dyn AuditCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub dashboard: Arc<dyn DashboardQuery>,
    pub locations: Arc<dyn LocationQuery>,
    pub audits: Arc<dyn AuditCommand>,
    /// Time source for session expiry checks.
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Construct state from the ports bundle and a clock.
    pub fn new(ports: HttpStatePorts, clock: Arc<dyn Clock>) -> Self {
        let HttpStatePorts {
            login,
            dashboard,
            locations,
            audits,
        } = ports;
        Self {
            login,
            dashboard,
            locations,
            audits,
            clock,
        }
    }
}
