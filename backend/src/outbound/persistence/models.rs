//! Internal Diesel row structs.
//!
//! Rows never leave the persistence layer; adapters convert them into domain
//! types and log rows that fail validation.

use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};

use crate::domain::{
    BusinessLine, ChecklistItem, LocationAssignment, LocationId, LocationValidationError, User,
};

use super::schema::{checklist, user_accessible_locations, users};

/// Row read from `users`; the password column is only ever filtered on.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub user_mail: String,
    pub user_first_name: String,
    pub user_last_name: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::new(row.user_mail, row.user_first_name, row.user_last_name)
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_accessible_locations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AssignmentRow {
    pub location_id: String,
    pub location_name: String,
    pub business_line: String,
    pub assigned_month: String,
}

impl TryFrom<AssignmentRow> for LocationAssignment {
    type Error = LocationValidationError;

    fn try_from(row: AssignmentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            location_id: LocationId::new(row.location_id)?,
            location_name: row.location_name,
            business_line: BusinessLine::new(row.business_line)?,
            assigned_month: row.assigned_month,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = checklist)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ChecklistRow {
    pub unique_id: String,
    pub description: String,
    pub impact: Option<String>,
    pub weightage: Option<i32>,
    pub owner: Option<String>,
    pub department: Option<String>,
    pub business_line: String,
}

impl TryFrom<ChecklistRow> for ChecklistItem {
    type Error = LocationValidationError;

    fn try_from(row: ChecklistRow) -> Result<Self, Self::Error> {
        Ok(Self {
            unique_id: row.unique_id,
            description: row.description,
            impact: row.impact.unwrap_or_default(),
            weightage: row.weightage,
            owner: row.owner.unwrap_or_default(),
            department: row.department.unwrap_or_default(),
            business_line: BusinessLine::new(row.business_line)?,
        })
    }
}

/// `SELECT count(*) AS count` result from an audit table.
#[derive(Debug, QueryableByName)]
pub(crate) struct CountRow {
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}

/// `SELECT DISTINCT unique_id` result from an audit table.
#[derive(Debug, QueryableByName)]
pub(crate) struct UniqueIdRow {
    #[diesel(sql_type = Text)]
    pub unique_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn checklist_row(business_line: &str) -> ChecklistRow {
        ChecklistRow {
            unique_id: "CHK-1".to_owned(),
            description: "Fire exits are clear".to_owned(),
            impact: None,
            weightage: Some(5),
            owner: None,
            department: Some("Operations".to_owned()),
            business_line: business_line.to_owned(),
        }
    }

    #[rstest]
    fn null_checklist_columns_become_blank() {
        let item = ChecklistItem::try_from(checklist_row("T1")).expect("valid row");

        assert_eq!(item.impact, "");
        assert_eq!(item.owner, "");
        assert!(!item.has_owner());
        assert_eq!(item.weightage, Some(5));
    }

    #[rstest]
    #[case("")]
    #[case("t1; drop table users")]
    fn unsafe_business_lines_are_rejected(#[case] business_line: &str) {
        assert!(ChecklistItem::try_from(checklist_row(business_line)).is_err());
    }

    #[rstest]
    fn assignment_rows_validate_identifiers() {
        let row = AssignmentRow {
            location_id: "L1".to_owned(),
            location_name: "Main Street".to_owned(),
            business_line: "T1".to_owned(),
            assigned_month: "Mar-2025".to_owned(),
        };
        let assignment = LocationAssignment::try_from(row).expect("valid row");

        assert_eq!(assignment.location_id.as_str(), "L1");
        assert_eq!(assignment.business_line.audit_table(), "t1_audit_data");
    }
}
