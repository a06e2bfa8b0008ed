//! Driving port for browsing a single location's checklist.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{BusinessLine, ChecklistItem, Error, LocationId, OwnerTally, Redirect};

/// Owners with remaining work at a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationOverview {
    #[schema(value_type = String, example = "L1")]
    pub location_id: LocationId,
    pub location_name: String,
    #[schema(value_type = String, example = "T1")]
    pub business_line: BusinessLine,
    /// Sorted by owner name; empty once every item is recorded.
    pub owners: Vec<OwnerTally>,
    /// True when nothing is left to score.
    pub fully_audited: bool,
    /// Set to the dashboard once the location is fully audited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<Redirect>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationQuery: Send + Sync {
    /// Owner tallies for a location the user can access.
    async fn overview(
        &self,
        user_mail: &str,
        location_id: &LocationId,
    ) -> Result<LocationOverview, Error>;

    /// Checklist items for `owner` not yet recorded at the location.
    async fn descriptions(
        &self,
        user_mail: &str,
        location_id: &LocationId,
        owner: &str,
    ) -> Result<Vec<ChecklistItem>, Error>;

    /// Incomplete items whose description contains `query`.
    async fn search(
        &self,
        user_mail: &str,
        location_id: &LocationId,
        query: &str,
    ) -> Result<Vec<ChecklistItem>, Error>;
}
