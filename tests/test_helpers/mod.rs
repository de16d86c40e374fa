//! Shared helpers for integration tests.

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

/// Clock pinned to one instant so "today" is deterministic.
#[derive(Debug, Clone, Copy)]
pub struct TestClock {
    now: DateTime<Utc>,
}

impl TestClock {
    /// Creates a clock fixed at `now`.
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Clock for TestClock {
    fn local(&self) -> DateTime<Local> {
        self.now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.now
    }
}

/// Builds a UTC timestamp from calendar parts.
///
/// # Panics
///
/// Panics when the parts do not name a valid instant.
pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("valid timestamp")
}
