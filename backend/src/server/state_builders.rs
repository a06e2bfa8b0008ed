//! Builders wiring repositories into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::warn;

use audit_backend::domain::ports::{
    AuditRepository, ChecklistRepository, LocationRepository, UserRepository,
};
use audit_backend::domain::{AuditService, DashboardService, LocationService, UserLoginService};
use audit_backend::inbound::http::state::{HttpState, HttpStatePorts};
use audit_backend::outbound::memory::InMemoryAuditStore;
use audit_backend::outbound::persistence::{
    DbPool, DieselAuditRepository, DieselChecklistRepository, DieselLocationRepository,
    DieselUserRepository,
};

use super::ServerConfig;

/// The four repositories every service draws from.
struct Repositories<U, L, C, A> {
    users: Arc<U>,
    locations: Arc<L>,
    checklist: Arc<C>,
    audits: Arc<A>,
}

fn wire_ports<U, L, C, A>(repos: Repositories<U, L, C, A>, clock: Arc<dyn Clock>) -> HttpStatePorts
where
    U: UserRepository + 'static,
    L: LocationRepository + 'static,
    C: ChecklistRepository + 'static,
    A: AuditRepository + 'static,
{
    let Repositories {
        users,
        locations,
        checklist,
        audits,
    } = repos;
    HttpStatePorts {
        login: Arc::new(UserLoginService::new(users, clock.clone())),
        dashboard: Arc::new(DashboardService::new(
            locations.clone(),
            checklist.clone(),
            audits.clone(),
            clock.clone(),
        )),
        locations: Arc::new(LocationService::new(
            locations.clone(),
            checklist.clone(),
            audits.clone(),
        )),
        audits: Arc::new(AuditService::new(locations, checklist, audits, clock)),
    }
}

fn diesel_repositories(
    pool: &DbPool,
) -> Repositories<
    DieselUserRepository,
    DieselLocationRepository,
    DieselChecklistRepository,
    DieselAuditRepository,
> {
    Repositories {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        locations: Arc::new(DieselLocationRepository::new(pool.clone())),
        checklist: Arc::new(DieselChecklistRepository::new(pool.clone())),
        audits: Arc::new(DieselAuditRepository::new(pool.clone())),
    }
}

fn memory_repositories(
    store: Arc<InMemoryAuditStore>,
) -> Repositories<InMemoryAuditStore, InMemoryAuditStore, InMemoryAuditStore, InMemoryAuditStore>
{
    Repositories {
        users: store.clone(),
        locations: store.clone(),
        checklist: store.clone(),
        audits: store,
    }
}

fn build_ports(db_pool: Option<&DbPool>, clock: Arc<dyn Clock>) -> HttpStatePorts {
    match db_pool {
        Some(pool) => wire_ports(diesel_repositories(pool), clock),
        None => {
            warn!("no database configured; serving from an empty in-memory store");
            let store = Arc::new(InMemoryAuditStore::with_unique_audits());
            wire_ports(memory_repositories(store), clock)
        }
    }
}

/// Build the shared HTTP state for the configured backend.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let ports = build_ports(config.db_pool.as_ref(), clock.clone());
    web::Data::new(HttpState::new(ports, clock))
}
