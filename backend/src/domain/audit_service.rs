//! Scoring workflow: open an item, record a score, report what comes next.
//!
//! The duplicate check before insert is best effort. Two concurrent
//! submissions for the same item can both pass it; the Diesel adapter reports
//! a unique-index violation as a conflict when the table carries one.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AuditCommand, AuditRepository, ChecklistRepository, LocationRepository, SubmissionOutcome,
    TaskForScoring,
};
use crate::domain::service_support::{
    already_audited, map_audit_error, map_checklist_error, require_assignment,
};
use crate::domain::{
    AuditSubmission, ChecklistItem, Error, LocationAssignment, LocationId, NewAuditRecord,
    PointId, Score, User,
};

/// Service implementing [`AuditCommand`].
#[derive(Clone)]
pub struct AuditService<L, C, A> {
    locations: Arc<L>,
    checklist: Arc<C>,
    audits: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<L, C, A> AuditService<L, C, A> {
    /// Create the service; `clock` stamps point ids.
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

impl<L, C, A> AuditService<L, C, A>
where
    C: ChecklistRepository,
    A: AuditRepository,
{
    async fn ensure_not_audited(
        &self,
        assignment: &LocationAssignment,
        unique_id: &str,
    ) -> Result<u64, Error> {
        let existing = self
            .audits
            .count_for_item(&assignment.business_line, &assignment.location_id, unique_id)
            .await
            .map_err(map_audit_error)?;
        if existing > 0 {
            debug!(location_id = %assignment.location_id, unique_id, "item already audited");
            return Err(already_audited(unique_id));
        }
        Ok(existing)
    }

    async fn load_item(
        &self,
        assignment: &LocationAssignment,
        owner: &str,
        unique_id: &str,
    ) -> Result<ChecklistItem, Error> {
        self.checklist
            .find_item(&assignment.business_line, owner, unique_id)
            .await
            .map_err(map_checklist_error)?
            .ok_or_else(|| Error::not_found("task not found"))
    }

    async fn outcome_after_insert(
        &self,
        assignment: &LocationAssignment,
        owner: &str,
    ) -> Result<SubmissionOutcome, Error> {
        let checklist = self
            .checklist
            .list_for_business_line(&assignment.business_line)
            .await
            .map_err(map_checklist_error)?;
        let completed = self
            .audits
            .completed_ids(&assignment.business_line, &assignment.location_id)
            .await
            .map_err(map_audit_error)?;

        if checklist
            .iter()
            .all(|item| completed.contains(&item.unique_id))
        {
            info!(location_id = %assignment.location_id, "location fully audited");
            return Ok(SubmissionOutcome::LocationCompleted {
                location_id: assignment.location_id.clone(),
            });
        }

        let remaining = checklist
            .iter()
            .filter(|item| item.owner == owner && !completed.contains(&item.unique_id))
            .count();
        Ok(SubmissionOutcome::ReturnToOwner {
            owner: owner.to_owned(),
            business_line: assignment.business_line.clone(),
            remaining_for_owner: u64::try_from(remaining).unwrap_or(u64::MAX),
        })
    }
}

#[async_trait]
impl<L, C, A> AuditCommand for AuditService<L, C, A>
where
    L: LocationRepository,
    C: ChecklistRepository,
    A: AuditRepository,
{
    async fn prepare_task(
        &self,
        user_mail: &str,
        location_id: &LocationId,
        unique_id: &str,
        owner: &str,
    ) -> Result<TaskForScoring, Error> {
        let assignment = require_assignment(self.locations.as_ref(), user_mail, location_id).await?;
        self.ensure_not_audited(&assignment, unique_id).await?;
        let item = self.load_item(&assignment, owner, unique_id).await?;
        Ok(TaskForScoring {
            proposed_score: Score::from_weightage(item.weightage),
            location_id: assignment.location_id,
            location_name: assignment.location_name,
            item,
        })
    }

    async fn submit(
        &self,
        user: &User,
        location_id: &LocationId,
        submission: AuditSubmission,
    ) -> Result<SubmissionOutcome, Error> {
        let assignment =
            require_assignment(self.locations.as_ref(), user.email(), location_id).await?;
        let item = self
            .load_item(&assignment, submission.owner(), submission.unique_id())
            .await?;
        let previous = self
            .ensure_not_audited(&assignment, submission.unique_id())
            .await?;

        let point_id = PointId::generate(self.clock.utc(), &mut rand::thread_rng());
        let record = NewAuditRecord::assemble(
            point_id,
            &assignment,
            &item,
            &submission,
            previous,
            user.email(),
        );
        if let Err(error) = self.audits.insert(&record).await {
            warn!(
                location_id = %assignment.location_id,
                unique_id = %record.unique_id,
                %error,
                "audit insert failed"
            );
            return Err(map_audit_error(error));
        }
        info!(
            location_id = %assignment.location_id,
            business_line = %assignment.business_line,
            unique_id = %record.unique_id,
            point_id = %record.point_id,
            "audit recorded"
        );

        self.outcome_after_insert(&assignment, submission.owner())
            .await
    }
}
