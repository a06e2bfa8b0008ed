//! Driving port for scoring checklist items.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    AuditSubmission, BusinessLine, ChecklistItem, Error, LocationId, Score, User,
};

/// A checklist item opened for scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskForScoring {
    #[schema(value_type = String, example = "L1")]
    pub location_id: LocationId,
    pub location_name: String,
    pub item: ChecklistItem,
    /// Initial score taken from the item's weightage.
    #[schema(value_type = Option<crate::domain::ScoreDto>)]
    pub proposed_score: Option<Score>,
}

/// Where the client goes after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SubmissionOutcome {
    /// Every checklist item is recorded; back to the dashboard.
    LocationCompleted {
        #[schema(value_type = String, example = "L1")]
        location_id: LocationId,
    },
    /// Work remains; back to the location with the owner still selected.
    ReturnToOwner {
        #[schema(example = "Ops")]
        owner: String,
        #[schema(value_type = String, example = "T1")]
        business_line: BusinessLine,
        /// Items still open for the owner at this location.
        remaining_for_owner: u64,
    },
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditCommand: Send + Sync {
    /// Load an unrecorded item for scoring.
    async fn prepare_task(
        &self,
        user_mail: &str,
        location_id: &LocationId,
        unique_id: &str,
        owner: &str,
    ) -> Result<TaskForScoring, Error>;

    /// Record a validated submission and report what comes next.
    async fn submit(
        &self,
        user: &User,
        location_id: &LocationId,
        submission: AuditSubmission,
    ) -> Result<SubmissionOutcome, Error>;
}
