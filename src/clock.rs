//! Time source and calendar-day helpers.
//!
//! Everything that depends on "now" reads it through a [`Clock`], so time
//! accrual and day rollover can be driven deterministically in tests.

use std::cell::Cell;

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, Utc};

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Milliseconds since the Unix epoch, the unit stored on tasks.
    fn now_ms(&self) -> i64 {
        self.now().timestamp_millis()
    }

    /// Calendar day in the host's local timezone.
    fn today_local(&self) -> NaiveDate {
        self.now().with_timezone(&Local).date_naive()
    }
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Hand-driven clock for tests and replays.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        self.now.set(at);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Calendar day of `now` as seen from a fixed UTC offset in hours.
///
/// Offsets outside the valid range (-23..=23) fall back to UTC.
pub fn day_at_offset(now: DateTime<Utc>, offset_hours: i32) -> NaiveDate {
    match offset_hours.checked_mul(3600).and_then(FixedOffset::east_opt) {
        Some(offset) => now.with_timezone(&offset).date_naive(),
        None => now.date_naive(),
    }
}

/// Whole minutes between two epoch-millisecond stamps, never negative.
pub fn whole_minutes_between(start_ms: i64, end_ms: i64) -> u64 {
    if end_ms <= start_ms {
        return 0;
    }
    ((end_ms - start_ms) / 60_000) as u64
}
