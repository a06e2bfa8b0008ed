//! Audit scores, submissions, and stored audit records.
//!
//! A submission is validated in full before any repository is consulted: the
//! score must be one of the allowed values and a remark is mandatory unless
//! the score is a full five.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{BusinessLine, ChecklistItem, LocationAssignment, LocationId};

/// Score given to a checklist item.
///
/// Serialised as `0`, `3`, `5`, or the string `"NA"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScoreDto", into = "ScoreDto")]
pub enum Score {
    Zero,
    Three,
    Five,
    NotApplicable,
}

impl Score {
    /// Value persisted in the `audit_score` column; N/A is stored as null.
    pub fn stored_value(self) -> Option<i32> {
        match self {
            Self::Zero => Some(0),
            Self::Three => Some(3),
            Self::Five => Some(5),
            Self::NotApplicable => None,
        }
    }

    /// Initial score proposed from a checklist weightage.
    ///
    /// Weightages outside the score scale propose nothing.
    pub fn from_weightage(weightage: Option<i32>) -> Option<Self> {
        match weightage? {
            0 => Some(Self::Zero),
            3 => Some(Self::Three),
            5 => Some(Self::Five),
            _ => None,
        }
    }

    /// Only a full five may be submitted without a remark.
    pub fn requires_remark(self) -> bool {
        self != Self::Five
    }
}

/// Wire form of [`Score`].
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ScoreDto {
    /// One of 0, 3 or 5.
    Points(i32),
    /// The literal `"NA"`.
    Label(String),
}

impl TryFrom<ScoreDto> for Score {
    type Error = AuditValidationError;

    fn try_from(value: ScoreDto) -> Result<Self, Self::Error> {
        match value {
            ScoreDto::Points(0) => Ok(Self::Zero),
            ScoreDto::Points(3) => Ok(Self::Three),
            ScoreDto::Points(5) => Ok(Self::Five),
            ScoreDto::Label(label) if label.eq_ignore_ascii_case("na") => Ok(Self::NotApplicable),
            _ => Err(AuditValidationError::InvalidScore),
        }
    }
}

impl From<Score> for ScoreDto {
    fn from(value: Score) -> Self {
        match value.stored_value() {
            Some(points) => Self::Points(points),
            None => Self::Label("NA".to_owned()),
        }
    }
}

/// Validation failures for audit submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditValidationError {
    EmptyUniqueId,
    EmptyOwner,
    InvalidScore,
    RemarkRequired,
}

impl AuditValidationError {
    /// Field the failure refers to, for client error details.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyUniqueId => "uniqueId",
            Self::EmptyOwner => "owner",
            Self::InvalidScore => "score",
            Self::RemarkRequired => "remark",
        }
    }

    /// Stable code for client error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyUniqueId => "empty_unique_id",
            Self::EmptyOwner => "empty_owner",
            Self::InvalidScore => "invalid_score",
            Self::RemarkRequired => "remark_required",
        }
    }
}

impl fmt::Display for AuditValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUniqueId => write!(f, "checklist item id must not be empty"),
            Self::EmptyOwner => write!(f, "owner must not be empty"),
            Self::InvalidScore => write!(f, "score must be one of 0, 3, 5, or NA"),
            Self::RemarkRequired => write!(f, "remarks are required for all scores except 5"),
        }
    }
}

impl std::error::Error for AuditValidationError {}

/// Validated request to record one score.
///
/// # Examples
/// ```
/// use audit_backend::domain::{AuditSubmission, AuditValidationError, Score};
///
/// assert!(AuditSubmission::try_new("CHK-1", "Ops", Score::Five, "").is_ok());
/// assert_eq!(
///     AuditSubmission::try_new("CHK-1", "Ops", Score::NotApplicable, "  ").unwrap_err(),
///     AuditValidationError::RemarkRequired,
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditSubmission {
    unique_id: String,
    owner: String,
    score: Score,
    remark: String,
}

impl AuditSubmission {
    /// Validate raw inputs; the remark is stored trimmed.
    pub fn try_new(
        unique_id: &str,
        owner: &str,
        score: Score,
        remark: &str,
    ) -> Result<Self, AuditValidationError> {
        let unique_id = unique_id.trim();
        if unique_id.is_empty() {
            return Err(AuditValidationError::EmptyUniqueId);
        }
        let owner = owner.trim();
        if owner.is_empty() {
            return Err(AuditValidationError::EmptyOwner);
        }
        let remark = remark.trim();
        if score.requires_remark() && remark.is_empty() {
            return Err(AuditValidationError::RemarkRequired);
        }
        Ok(Self {
            unique_id: unique_id.to_owned(),
            owner: owner.to_owned(),
            score,
            remark: remark.to_owned(),
        })
    }

    /// Checklist item being scored.
    pub fn unique_id(&self) -> &str {
        self.unique_id.as_str()
    }

    /// Owner whose list the item was opened from.
    pub fn owner(&self) -> &str {
        self.owner.as_str()
    }

    pub fn score(&self) -> Score {
        self.score
    }

    /// Trimmed remark; may be empty for a full score.
    pub fn remark(&self) -> &str {
        self.remark.as_str()
    }
}

/// Identifier of a stored audit row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PointId(String);

impl PointId {
    /// Millisecond timestamp, six random digits, then four uppercase letters.
    ///
    /// # Examples
    /// ```
    /// use audit_backend::domain::PointId;
    /// use chrono::{TimeZone, Utc};
    ///
    /// let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
    /// let id = PointId::generate(now, &mut rand::thread_rng());
    /// assert!(id.as_str().starts_with("1700000000000"));
    /// assert_eq!(id.as_str().len(), 13 + 6 + 4);
    /// ```
    pub fn generate<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> Self {
        let digits: u32 = rng.gen_range(0..1_000_000);
        let letters: String = (0..4)
            .map(|_| char::from(rng.gen_range(b'A'..=b'Z')))
            .collect();
        Self(format!("{}{digits:06}{letters}", now.timestamp_millis()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Row written to a business line's audit table.
///
/// Checklist fields are snapshotted so later checklist edits do not rewrite
/// history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditRecord {
    pub point_id: PointId,
    pub location_id: LocationId,
    pub location_name: String,
    pub business_line: BusinessLine,
    pub unique_id: String,
    pub owner: String,
    pub department: String,
    pub description: String,
    pub impact: String,
    pub weightage: Option<i32>,
    pub audit_score: Option<i32>,
    pub audit_remarks: String,
    /// Stored as text; one more than the rows already recorded for the item.
    pub audit_number: String,
    pub user_mail: String,
}

impl NewAuditRecord {
    /// Assemble the row for `submission` against `item` at `location`.
    pub fn assemble(
        point_id: PointId,
        location: &LocationAssignment,
        item: &ChecklistItem,
        submission: &AuditSubmission,
        previous_audits: u64,
        user_mail: &str,
    ) -> Self {
        Self {
            point_id,
            location_id: location.location_id.clone(),
            location_name: location.location_name.clone(),
            business_line: item.business_line.clone(),
            unique_id: item.unique_id.clone(),
            owner: item.owner.clone(),
            department: item.department.clone(),
            description: item.description.clone(),
            impact: item.impact.clone(),
            weightage: item.weightage,
            audit_score: submission.score().stored_value(),
            audit_remarks: submission.remark().to_owned(),
            audit_number: (previous_audits + 1).to_string(),
            user_mail: user_mail.to_owned(),
        }
    }
}
