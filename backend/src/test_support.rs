//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`). Only
//! compiled for tests or with the `test-support` feature.

use std::sync::Mutex;

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

/// Clock whose current time is set and advanced by the test.
///
/// # Examples
/// ```
/// use audit_backend::test_support::MutableClock;
/// use chrono::{TimeZone, Utc};
/// use mockable::Clock;
///
/// let clock = MutableClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap());
/// clock.advance_hours(4);
/// assert_eq!(clock.utc(), Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap());
/// ```
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    pub fn advance_hours(&self, hours: i64) {
        *self.lock_clock() += TimeDelta::hours(hours);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// `"Mon-YYYY"` label for the month containing `instant`.
pub fn month_label(instant: DateTime<Utc>) -> String {
    instant.format("%b-%Y").to_string()
}
