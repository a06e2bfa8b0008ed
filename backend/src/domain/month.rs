//! Assigned month parsing for location assignments.
//!
//! Assignments carry a `"Mon-YYYY"` string such as `"Mar-2025"`. An assignment
//! is active for its own month and every earlier month; once the calendar
//! moves past it the location drops off the dashboard.

use chrono::{DateTime, Datelike, Utc};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Calendar month an assignment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AssignedMonth {
    year: i32,
    // Zero-based so ordering matches the tuple order.
    month0: u32,
}

impl AssignedMonth {
    /// Parse `"Mon-YYYY"`; abbreviations are matched exactly.
    ///
    /// # Examples
    /// ```
    /// use audit_backend::domain::AssignedMonth;
    ///
    /// assert!(AssignedMonth::parse("Mar-2025").is_some());
    /// assert!(AssignedMonth::parse("March-2025").is_none());
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let (month, year) = raw.trim().split_once('-')?;
        let month0 = MONTHS.iter().position(|candidate| *candidate == month)?;
        let year = year.parse::<i32>().ok()?;
        Some(Self {
            year,
            month0: u32::try_from(month0).ok()?,
        })
    }

    /// Month containing `instant`, in UTC.
    pub fn containing(instant: DateTime<Utc>) -> Self {
        Self {
            year: instant.year(),
            month0: instant.month0(),
        }
    }

    /// Whether this month is the month of `now` or later.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        *self >= Self::containing(now)
    }
}

/// Active check straight from the stored string; unparseable values are
/// inactive.
pub fn is_assignment_active(raw: &str, now: DateTime<Utc>) -> bool {
    AssignedMonth::parse(raw).is_some_and(|month| month.is_active_at(now))
}
