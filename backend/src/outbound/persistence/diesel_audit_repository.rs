//! PostgreSQL-backed `AuditRepository`.
//!
//! Each business line owns a `<line>_audit_data` table, so statements are
//! built with the table identifier from [`BusinessLine::audit_table`] and run
//! through `sql_query`. The identifier is safe to interpolate because business
//! lines only admit ASCII letters, digits, and underscores; every value is a
//! bound parameter.

use std::collections::HashSet;

use async_trait::async_trait;
use diesel::sql_query;
use diesel::sql_types::{Integer, Nullable, Text};
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{AuditRepository, AuditRepositoryError};
use crate::domain::{BusinessLine, LocationId, NewAuditRecord};

use super::diesel_error_mapping::{self, is_unique_violation};
use super::models::{CountRow, UniqueIdRow};
use super::pool::{DbPool, PoolError};

/// Reads and appends rows in the per-business-line audit tables.
#[derive(Clone)]
pub struct DieselAuditRepository {
    pool: DbPool,
}

impl DieselAuditRepository {
    /// Create a repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn count_for_location_sql(business_line: &BusinessLine) -> String {
    format!(
        "SELECT count(*) AS count FROM {} WHERE location_id = $1",
        business_line.audit_table()
    )
}

fn completed_ids_sql(business_line: &BusinessLine) -> String {
    format!(
        "SELECT DISTINCT unique_id FROM {} WHERE location_id = $1",
        business_line.audit_table()
    )
}

fn count_for_item_sql(business_line: &BusinessLine) -> String {
    format!(
        "SELECT count(*) AS count FROM {} WHERE location_id = $1 AND unique_id = $2",
        business_line.audit_table()
    )
}

fn insert_sql(business_line: &BusinessLine) -> String {
    format!(
        "INSERT INTO {} (point_id, location_id, location_name, business_line, unique_id, \
         owner, department, description, impact, weightage, audit_score, audit_remarks, \
         audit_number, user_mail) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        business_line.audit_table()
    )
}

fn map_pool_error(error: PoolError) -> AuditRepositoryError {
    diesel_error_mapping::map_pool_error(error, AuditRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> AuditRepositoryError {
    diesel_error_mapping::map_diesel_error(
        error,
        operation,
        AuditRepositoryError::query,
        AuditRepositoryError::connection,
    )
}

fn to_count(row: CountRow) -> u64 {
    u64::try_from(row.count).unwrap_or_default()
}

#[async_trait]
impl AuditRepository for DieselAuditRepository {
    async fn count_for_location(
        &self,
        business_line: &BusinessLine,
        location_id: &LocationId,
    ) -> Result<u64, AuditRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: CountRow = sql_query(count_for_location_sql(business_line))
            .bind::<Text, _>(location_id.as_str())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "count audits for location"))?;
        Ok(to_count(row))
    }

    async fn completed_ids(
        &self,
        business_line: &BusinessLine,
        location_id: &LocationId,
    ) -> Result<HashSet<String>, AuditRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UniqueIdRow> = sql_query(completed_ids_sql(business_line))
            .bind::<Text, _>(location_id.as_str())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list completed items"))?;
        Ok(rows.into_iter().map(|row| row.unique_id).collect())
    }

    async fn count_for_item(
        &self,
        business_line: &BusinessLine,
        location_id: &LocationId,
        unique_id: &str,
    ) -> Result<u64, AuditRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: CountRow = sql_query(count_for_item_sql(business_line))
            .bind::<Text, _>(location_id.as_str())
            .bind::<Text, _>(unique_id)
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "count audits for item"))?;
        Ok(to_count(row))
    }

    async fn insert(&self, record: &NewAuditRecord) -> Result<(), AuditRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        sql_query(insert_sql(&record.business_line))
            .bind::<Text, _>(record.point_id.as_str())
            .bind::<Text, _>(record.location_id.as_str())
            .bind::<Text, _>(&record.location_name)
            .bind::<Text, _>(record.business_line.as_str())
            .bind::<Text, _>(&record.unique_id)
            .bind::<Text, _>(&record.owner)
            .bind::<Text, _>(&record.department)
            .bind::<Text, _>(&record.description)
            .bind::<Text, _>(&record.impact)
            .bind::<Nullable<Integer>, _>(record.weightage)
            .bind::<Nullable<Integer>, _>(record.audit_score)
            .bind::<Text, _>(&record.audit_remarks)
            .bind::<Text, _>(&record.audit_number)
            .bind::<Text, _>(&record.user_mail)
            .execute(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    debug!(unique_id = %record.unique_id, location_id = %record.location_id, "audit insert hit unique index");
                    AuditRepositoryError::duplicate(record.unique_id.clone())
                } else {
                    map_diesel_error(err, "insert audit")
                }
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn line(raw: &str) -> BusinessLine {
        BusinessLine::new(raw).expect("valid business line")
    }

    #[rstest]
    #[case(count_for_location_sql(&line("T1")), "FROM t1_audit_data WHERE location_id = $1")]
    #[case(completed_ids_sql(&line("Retail_2")), "FROM retail_2_audit_data WHERE location_id = $1")]
    #[case(count_for_item_sql(&line("T1")), "location_id = $1 AND unique_id = $2")]
    #[case(insert_sql(&line("T1")), "INSERT INTO t1_audit_data (point_id,")]
    fn statements_target_the_business_line_table(#[case] sql: String, #[case] fragment: &str) {
        assert!(sql.contains(fragment), "{sql}");
    }

    #[rstest]
    fn insert_binds_every_column() {
        let sql = insert_sql(&line("T1"));
        let columns = sql
            .split_once('(')
            .and_then(|(_, rest)| rest.split_once(')'))
            .map(|(columns, _)| columns.split(',').count())
            .expect("column list");

        assert_eq!(columns, 14);
        assert!(sql.contains("$14"));
        assert!(!sql.contains("$15"));
    }

    #[rstest]
    #[case(-1, 0)]
    #[case(0, 0)]
    #[case(7, 7)]
    fn counts_never_go_negative(#[case] raw: i64, #[case] expected: u64) {
        assert_eq!(to_count(CountRow { count: raw }), expected);
    }
}
