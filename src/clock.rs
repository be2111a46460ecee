//! Wall clock and the fixed UTC+8 reference clock used for days and hours.

use chrono::{DateTime, FixedOffset, NaiveDate, Timelike, Utc};

/// Offset of the reference clock. There is no daylight saving time.
const REFERENCE_OFFSET_SECS: i32 = 8 * 3600;

/// Source of the current time.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current instant at the reference offset.
    fn now_local(&self) -> DateTime<FixedOffset> {
        local(self.now())
    }
}

/// The clock of the operating system.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// The UTC+8 offset of the reference clock.
pub fn reference_offset() -> FixedOffset {
    FixedOffset::east_opt(REFERENCE_OFFSET_SECS)
        .expect("BUG: the reference offset is out of the valid range")
}

/// Converts any instant to the reference clock.
pub fn local<Tz: chrono::TimeZone>(at: DateTime<Tz>) -> DateTime<FixedOffset> {
    at.with_timezone(&reference_offset())
}

/// The calendar day of `at` in the reference clock.
pub fn day_of<Tz: chrono::TimeZone>(at: DateTime<Tz>) -> NaiveDate {
    local(at).date_naive()
}

/// The hour of the day of `at` in the reference clock.
pub fn hour_of<Tz: chrono::TimeZone>(at: DateTime<Tz>) -> u32 {
    local(at).hour()
}

/// A clock which only moves when it is told to.
#[cfg(test)]
pub(crate) struct ManualClock(std::cell::Cell<DateTime<Utc>>);

#[cfg(test)]
impl ManualClock {
    /// Creates a clock stopped at `rfc3339`.
    pub(crate) fn at(rfc3339: &str) -> Self {
        ManualClock(std::cell::Cell::new(parse(rfc3339)))
    }

    /// Moves the clock to `rfc3339`.
    pub(crate) fn set(&self, rfc3339: &str) {
        self.0.set(parse(rfc3339));
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.0.get()
    }
}

#[cfg(test)]
pub(crate) fn parse(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .expect("valid RFC 3339 date-time")
        .with_timezone(&Utc)
}
