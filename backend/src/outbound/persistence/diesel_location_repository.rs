//! PostgreSQL-backed `LocationRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{LocationRepository, LocationRepositoryError};
use crate::domain::{LocationAssignment, LocationId};

use super::diesel_error_mapping;
use super::models::AssignmentRow;
use super::pool::{DbPool, PoolError};
use super::schema::user_accessible_locations as assignments;

/// Reads `user_accessible_locations`.
#[derive(Clone)]
pub struct DieselLocationRepository {
    pool: DbPool,
}

impl DieselLocationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> LocationRepositoryError {
    diesel_error_mapping::map_pool_error(error, LocationRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> LocationRepositoryError {
    diesel_error_mapping::map_diesel_error(
        error,
        operation,
        LocationRepositoryError::query,
        LocationRepositoryError::connection,
    )
}

#[async_trait]
impl LocationRepository for DieselLocationRepository {
    async fn list_for_user(
        &self,
        user_mail: &str,
    ) -> Result<Vec<LocationAssignment>, LocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AssignmentRow> = assignments::table
            .filter(assignments::user_mail.eq(user_mail))
            .order(assignments::location_id.asc())
            .select(AssignmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list assignments"))?;

        // One malformed assignment must not hide the rest of the dashboard.
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let location_id = row.location_id.clone();
                LocationAssignment::try_from(row)
                    .inspect_err(|err| {
                        warn!(%location_id, error = %err, "skipping malformed assignment row");
                    })
                    .ok()
            })
            .collect())
    }

    async fn find_for_user(
        &self,
        user_mail: &str,
        location_id: &LocationId,
    ) -> Result<Option<LocationAssignment>, LocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = assignments::table
            .filter(assignments::user_mail.eq(user_mail))
            .filter(assignments::location_id.eq(location_id.as_str()))
            .select(AssignmentRow::as_select())
            .first::<AssignmentRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find assignment"))?;

        row.map(LocationAssignment::try_from)
            .transpose()
            .map_err(|err| LocationRepositoryError::query(format!("malformed assignment: {err}")))
    }
}
