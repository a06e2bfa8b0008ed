//! Dashboard aggregation over the user's active assignments.
//!
//! For each active location two independent counts are fetched concurrently
//! (checklist size and recorded audits) and merged into a
//! [`LocationSummary`].

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::{try_join, try_join_all};
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{AuditRepository, ChecklistRepository, DashboardQuery, LocationRepository};
use crate::domain::service_support::{map_audit_error, map_checklist_error, map_location_error};
use crate::domain::{Error, LocationAssignment, LocationSummary, is_assignment_active};

/// Service implementing [`DashboardQuery`].
#[derive(Clone)]
pub struct DashboardService<L, C, A> {
    locations: Arc<L>,
    checklist: Arc<C>,
    audits: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<L, C, A> DashboardService<L, C, A> {
    /// Create the service; `clock` decides which assignment months are active.
    pub fn new(
        locations: Arc<L>,
        checklist: Arc<C>,
        audits: Arc<A>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            locations,
            checklist,
            audits,
            clock,
        }
    }
}

impl<L, C, A> DashboardService<L, C, A>
where
    C: ChecklistRepository,
    A: AuditRepository,
{
    async fn summarise(&self, assignment: LocationAssignment) -> Result<LocationSummary, Error> {
        let assigned = async {
            self.checklist
                .count_for_business_line(&assignment.business_line)
                .await
                .map_err(map_checklist_error)
        };
        let completed = async {
            self.audits
                .count_for_location(&assignment.business_line, &assignment.location_id)
                .await
                .map_err(map_audit_error)
        };
        let (assigned, completed) = try_join(assigned, completed).await?;
        debug!(
            location_id = %assignment.location_id,
            business_line = %assignment.business_line,
            assigned,
            completed,
            "location counts fetched"
        );
        Ok(LocationSummary::from_counts(assignment, assigned, completed))
    }
}

#[async_trait]
impl<L, C, A> DashboardQuery for DashboardService<L, C, A>
where
    L: LocationRepository,
    C: ChecklistRepository,
    A: AuditRepository,
{
    async fn active_locations(&self, user_mail: &str) -> Result<Vec<LocationSummary>, Error> {
        let now = self.clock.utc();
        let assignments = self
            .locations
            .list_for_user(user_mail)
            .await
            .map_err(map_location_error)?;
        let total = assignments.len();
        let active: Vec<_> = assignments
            .into_iter()
            .filter(|assignment| is_assignment_active(&assignment.assigned_month, now))
            .collect();
        info!(total, active = active.len(), "loading dashboard locations");

        try_join_all(active.into_iter().map(|assignment| self.summarise(assignment))).await
    }
}
