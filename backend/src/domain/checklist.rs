//! Static checklist items shared across locations of a business line.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::BusinessLine;

/// One audit question.
///
/// `weightage` is the default score proposed when the item is opened for
/// scoring; many items carry none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    #[schema(example = "CHK-001")]
    pub unique_id: String,
    #[schema(example = "Fire exits are unobstructed")]
    pub description: String,
    #[schema(example = "High")]
    pub impact: String,
    pub weightage: Option<i32>,
    #[schema(example = "Ops")]
    pub owner: String,
    pub department: String,
    #[schema(value_type = String, example = "T1")]
    pub business_line: BusinessLine,
}

impl ChecklistItem {
    /// Items with a blank owner are excluded from owner grouping.
    pub fn has_owner(&self) -> bool {
        !self.owner.trim().is_empty()
    }
}
