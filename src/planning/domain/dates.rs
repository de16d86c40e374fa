//! Date parsing and calendar-day windows.

use super::PlanningDomainError;
use chrono::{
    DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta, TimeZone, Utc,
};
use mockable::Clock;

/// Milliseconds from midnight to the last representable millisecond of a day.
const LAST_MILLISECOND_OF_DAY: i64 = 86_399_999;

/// Parses a date supplied by a client.
///
/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS` timestamps
/// (interpreted as UTC), and bare `YYYY-MM-DD` dates (midnight UTC).
///
/// # Errors
///
/// Returns [`PlanningDomainError::InvalidDate`] when none of the accepted
/// formats match.
pub fn parse_date(value: &str) -> Result<DateTime<Utc>, PlanningDomainError> {
    let trimmed = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| PlanningDomainError::InvalidDate(value.to_owned()))
}

/// Inclusive bounds of one calendar day, held as UTC instants.
///
/// The day is taken in the time zone of the instant that selects it, so a
/// window built from local time starts at local midnight.
///
/// # Examples
///
/// ```
/// use chrono::{FixedOffset, TimeZone, Utc};
/// use taskboard::planning::domain::DayWindow;
///
/// let noon = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
/// let window = DayWindow::containing(&noon);
/// assert!(window.contains(Utc.with_ymd_and_hms(2024, 3, 9, 0, 0, 0).unwrap()));
/// assert!(!window.contains(Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap()));
///
/// let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
/// let window = DayWindow::containing(&noon.with_timezone(&tokyo));
/// assert_eq!(window.start(), Utc.with_ymd_and_hms(2024, 3, 8, 15, 0, 0).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DayWindow {
    /// Returns the window for the calendar day containing `instant` in its
    /// own time zone.
    #[must_use]
    pub fn containing<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        let zone = instant.timezone();
        let date = instant.date_naive();
        let start = start_of_day(&zone, date);
        let end = date.succ_opt().map_or_else(
            || start + TimeDelta::milliseconds(LAST_MILLISECOND_OF_DAY),
            |next| start_of_day(&zone, next) - TimeDelta::milliseconds(1),
        );
        Self { start, end }
    }

    /// Returns the window for the current local day according to `clock`.
    #[must_use]
    pub fn today(clock: &impl Clock) -> Self {
        Self::containing(&clock.local())
    }

    /// Returns the first instant of the day.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Returns the last millisecond of the day.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns `true` when `instant` falls inside the window, bounds included.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// First instant of `date` in `zone`.
fn start_of_day<Tz: TimeZone>(zone: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    match zone.from_local_datetime(&midnight) {
        LocalResult::Single(start) | LocalResult::Ambiguous(start, _) => start.with_timezone(&Utc),
        // Midnight skipped by a clock change; the day starts once clocks resume.
        LocalResult::None => {
            let offset = zone.offset_from_utc_datetime(&midnight).fix();
            midnight.and_utc() - TimeDelta::seconds(i64::from(offset.local_minus_utc()))
        }
    }
}
