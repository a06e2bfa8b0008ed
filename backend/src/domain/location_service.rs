//! Owner browsing and search for a single location.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::try_join;
use tracing::debug;

use crate::domain::ports::{
    AuditRepository, ChecklistRepository, LocationOverview, LocationQuery, LocationRepository,
};
use crate::domain::service_support::{map_audit_error, map_checklist_error, require_assignment};
use crate::domain::{
    ChecklistItem, Error, LocationAssignment, LocationId, Redirect, filter_descriptions,
    incomplete_items, tally_owners,
};

/// Service implementing [`LocationQuery`].
#[derive(Clone)]
pub struct LocationService<L, C, A> {
    locations: Arc<L>,
    checklist: Arc<C>,
    audits: Arc<A>,
}

impl<L, C, A> LocationService<L, C, A> {
    /// Create the service over its three repositories.
    pub fn new(locations: Arc<L>, checklist: Arc<C>, audits: Arc<A>) -> Self {
        Self {
            locations,
            checklist,
            audits,
        }
    }
}

impl<L, C, A> LocationService<L, C, A>
where
    C: ChecklistRepository,
    A: AuditRepository,
{
    async fn completed_ids(&self, assignment: &LocationAssignment) -> Result<HashSet<String>, Error> {
        self.audits
            .completed_ids(&assignment.business_line, &assignment.location_id)
            .await
            .map_err(map_audit_error)
    }

    /// Full checklist and completed ids, fetched together.
    async fn checklist_with_progress(
        &self,
        assignment: &LocationAssignment,
    ) -> Result<(Vec<ChecklistItem>, HashSet<String>), Error> {
        let checklist = async {
            self.checklist
                .list_for_business_line(&assignment.business_line)
                .await
                .map_err(map_checklist_error)
        };
        try_join(checklist, self.completed_ids(assignment)).await
    }
}

#[async_trait]
impl<L, C, A> LocationQuery for LocationService<L, C, A>
where
    L: LocationRepository,
    C: ChecklistRepository,
    A: AuditRepository,
{
    async fn overview(
        &self,
        user_mail: &str,
        location_id: &LocationId,
    ) -> Result<LocationOverview, Error> {
        let assignment = require_assignment(self.locations.as_ref(), user_mail, location_id).await?;
        let (checklist, completed) = self.checklist_with_progress(&assignment).await?;
        let owners = tally_owners(&checklist, &completed);
        debug!(
            location_id = %assignment.location_id,
            owners = owners.len(),
            completed = completed.len(),
            "location overview built"
        );
        let fully_audited = owners.is_empty();
        Ok(LocationOverview {
            fully_audited,
            redirect: fully_audited.then(|| Redirect::to("/dashboard")),
            location_id: assignment.location_id,
            location_name: assignment.location_name,
            business_line: assignment.business_line,
            owners,
        })
    }

    async fn descriptions(
        &self,
        user_mail: &str,
        location_id: &LocationId,
        owner: &str,
    ) -> Result<Vec<ChecklistItem>, Error> {
        let assignment = require_assignment(self.locations.as_ref(), user_mail, location_id).await?;
        let owned = async {
            self.checklist
                .list_for_owner(&assignment.business_line, owner)
                .await
                .map_err(map_checklist_error)
        };
        let (items, completed) = try_join(owned, self.completed_ids(&assignment)).await?;
        Ok(incomplete_items(items, &completed))
    }

    async fn search(
        &self,
        user_mail: &str,
        location_id: &LocationId,
        query: &str,
    ) -> Result<Vec<ChecklistItem>, Error> {
        let assignment = require_assignment(self.locations.as_ref(), user_mail, location_id).await?;
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let (checklist, completed) = self.checklist_with_progress(&assignment).await?;
        Ok(filter_descriptions(&checklist, query, &completed)
            .into_iter()
            .cloned()
            .collect())
    }
}
