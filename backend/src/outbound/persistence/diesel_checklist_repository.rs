//! PostgreSQL-backed `ChecklistRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ChecklistRepository, ChecklistRepositoryError};
use crate::domain::{BusinessLine, ChecklistItem};

use super::diesel_error_mapping;
use super::models::ChecklistRow;
use super::pool::{DbPool, PoolError};
use super::schema::checklist;

/// Reads the shared `checklist` table.
#[derive(Clone)]
pub struct DieselChecklistRepository {
    pool: DbPool,
}

impl DieselChecklistRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ChecklistRepositoryError {
    diesel_error_mapping::map_pool_error(error, ChecklistRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> ChecklistRepositoryError {
    diesel_error_mapping::map_diesel_error(
        error,
        operation,
        ChecklistRepositoryError::query,
        ChecklistRepositoryError::connection,
    )
}

fn into_items(rows: Vec<ChecklistRow>) -> Result<Vec<ChecklistItem>, ChecklistRepositoryError> {
    rows.into_iter()
        .map(|row| {
            ChecklistItem::try_from(row).map_err(|err| {
                ChecklistRepositoryError::query(format!("malformed checklist row: {err}"))
            })
        })
        .collect()
}

#[async_trait]
impl ChecklistRepository for DieselChecklistRepository {
    async fn count_for_business_line(
        &self,
        business_line: &BusinessLine,
    ) -> Result<u64, ChecklistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = checklist::table
            .filter(checklist::business_line.eq(business_line.as_str()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "count checklist items"))?;
        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn list_for_business_line(
        &self,
        business_line: &BusinessLine,
    ) -> Result<Vec<ChecklistItem>, ChecklistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = checklist::table
            .filter(checklist::business_line.eq(business_line.as_str()))
            .order(checklist::unique_id.asc())
            .select(ChecklistRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list checklist"))?;
        into_items(rows)
    }

    async fn list_for_owner(
        &self,
        business_line: &BusinessLine,
        owner: &str,
    ) -> Result<Vec<ChecklistItem>, ChecklistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = checklist::table
            .filter(checklist::business_line.eq(business_line.as_str()))
            .filter(checklist::owner.eq(owner))
            .order(checklist::unique_id.asc())
            .select(ChecklistRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list checklist for owner"))?;
        into_items(rows)
    }

    async fn find_item(
        &self,
        business_line: &BusinessLine,
        owner: &str,
        unique_id: &str,
    ) -> Result<Option<ChecklistItem>, ChecklistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = checklist::table
            .filter(checklist::business_line.eq(business_line.as_str()))
            .filter(checklist::owner.eq(owner))
            .filter(checklist::unique_id.eq(unique_id))
            .select(ChecklistRow::as_select())
            .first::<ChecklistRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find checklist item"))?;
        Ok(into_items(row.into_iter().collect())?.pop())
    }
}
