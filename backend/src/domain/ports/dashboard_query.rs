//! Driving port for the dashboard's location list.

use async_trait::async_trait;

use crate::domain::{Error, LocationSummary};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardQuery: Send + Sync {
    /// Summaries for the user's assignments in the current month or later.
    async fn active_locations(&self, user_mail: &str) -> Result<Vec<LocationSummary>, Error>;
}
