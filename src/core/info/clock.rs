// src/core/info/clock.rs

use chrono::{DateTime, FixedOffset, Local, NaiveDate, TimeZone};

/// A source of wall-clock time, in the host's local offset.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The real local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<FixedOffset>);

impl FixedClock {
    pub fn new(instant: DateTime<FixedOffset>) -> Self {
        Self(instant)
    }

    /// A UTC instant on an arbitrary fixed date. Returns `None` for an
    /// out-of-range time of day.
    pub fn at_hms(hour: u32, minute: u32, second: u32) -> Option<Self> {
        let naive = NaiveDate::from_ymd_opt(2024, 5, 17)?.and_hms_opt(hour, minute, second)?;
        let utc = FixedOffset::east_opt(0)?;
        utc.from_local_datetime(&naive).single().map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}
