//! Locations assigned to auditors and their derived progress.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validation errors for location identifiers and business lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationValidationError {
    EmptyLocationId,
    EmptyBusinessLine,
    InvalidBusinessLine,
}

impl fmt::Display for LocationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLocationId => write!(f, "location id must not be empty"),
            Self::EmptyBusinessLine => write!(f, "business line must not be empty"),
            Self::InvalidBusinessLine => write!(
                f,
                "business line may only contain ASCII letters, digits, or underscores",
            ),
        }
    }
}

impl std::error::Error for LocationValidationError {}

/// Opaque location identifier as assigned by the provisioning process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocationId(String);

impl LocationId {
    /// Validate a trimmed, non-empty location id.
    pub fn new(id: impl Into<String>) -> Result<Self, LocationValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(LocationValidationError::EmptyLocationId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for LocationId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<LocationId> for String {
    fn from(value: LocationId) -> Self {
        value.0
    }
}

impl TryFrom<String> for LocationId {
    type Error = LocationValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static BUSINESS_LINE_RE: OnceLock<Regex> = OnceLock::new();

fn business_line_regex() -> &'static Regex {
    BUSINESS_LINE_RE.get_or_init(|| {
        Regex::new("^[A-Za-z0-9_]+$")
            .unwrap_or_else(|error| panic!("business line regex failed to compile: {error}"))
    })
}

/// Business line partitioning the checklist and selecting the audit table.
///
/// ## Invariants
/// - Non-empty and restricted to `[A-Za-z0-9_]`, so the derived audit table
///   name is always a safe SQL identifier.
///
/// # Examples
/// ```
/// use audit_backend::domain::BusinessLine;
///
/// let line = BusinessLine::new("T1").unwrap();
/// assert_eq!(line.audit_table(), "t1_audit_data");
/// assert!(BusinessLine::new("t1; drop table users").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BusinessLine(String);

impl BusinessLine {
    /// Validate a business line code usable as an audit table prefix.
    pub fn new(raw: impl Into<String>) -> Result<Self, LocationValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LocationValidationError::EmptyBusinessLine);
        }
        if !business_line_regex().is_match(trimmed) {
            return Err(LocationValidationError::InvalidBusinessLine);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Name of the table holding audit records for this business line.
    pub fn audit_table(&self) -> String {
        format!("{}_audit_data", self.0.to_lowercase())
    }
}

impl fmt::Display for BusinessLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<BusinessLine> for String {
    fn from(value: BusinessLine) -> Self {
        value.0
    }
}

impl TryFrom<String> for BusinessLine {
    type Error = LocationValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A location assigned to a user for a given month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationAssignment {
    pub location_id: LocationId,
    pub location_name: String,
    pub business_line: BusinessLine,
    /// Raw `"Mon-YYYY"` value; see [`crate::domain::AssignedMonth`].
    pub assigned_month: String,
}

/// Progress of a location derived from task counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum LocationStatus {
    Assigned,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl LocationStatus {
    /// Derive the status from assigned and completed counts.
    ///
    /// A location with no checklist items counts as completed once nothing is
    /// recorded, matching the lock rule `assigned == completed`.
    pub fn derive(assigned: u64, completed: u64) -> Self {
        if completed == assigned {
            Self::Completed
        } else if completed == 0 {
            Self::Assigned
        } else {
            Self::InProgress
        }
    }
}

/// Dashboard card for one active location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationSummary {
    #[schema(value_type = String, example = "L1")]
    pub location_id: LocationId,
    pub location_name: String,
    #[schema(value_type = String, example = "T1")]
    pub business_line: BusinessLine,
    #[schema(example = "Mar-2025")]
    pub assigned_month: String,
    pub assigned_tasks: u64,
    pub completed_tasks: u64,
    pub status: LocationStatus,
    /// Further entry is disabled once every task is recorded.
    pub locked: bool,
}

impl LocationSummary {
    /// Derive status and lock state from checklist and audit counts.
    pub fn from_counts(assignment: LocationAssignment, assigned: u64, completed: u64) -> Self {
        Self {
            location_id: assignment.location_id,
            location_name: assignment.location_name,
            business_line: assignment.business_line,
            assigned_month: assignment.assigned_month,
            assigned_tasks: assigned,
            completed_tasks: completed,
            status: LocationStatus::derive(assigned, completed),
            locked: assigned == completed,
        }
    }
}
