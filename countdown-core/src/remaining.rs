//! Time-remaining calculation.
//!
//! A pure, total decomposition of the millisecond gap between two instants
//! into floor-truncated days, hours, minutes and seconds. There is no month,
//! year or leap-second awareness; whatever chrono's instant subtraction yields
//! is what gets decomposed.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::{MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND};
use crate::units::TimeUnits;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct RemainingDuration {
    pub days: u64,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl RemainingDuration {
    pub const ZERO: Self = Self {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Remaining time from `now` until `target`, clamped to zero once the
    /// target has been reached.
    #[must_use]
    pub fn compute(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let diff = target.signed_duration_since(now).num_milliseconds();
        Self::from_millis(diff)
    }

    /// Decompose a raw millisecond difference. Non-positive input is zero.
    #[must_use]
    pub fn from_millis(diff: i64) -> Self {
        if diff <= 0 {
            return Self::ZERO;
        }
        // diff > 0, so every quotient and remainder below is non-negative.
        let days = diff / MILLIS_PER_DAY;
        let hours = (diff % MILLIS_PER_DAY) / MILLIS_PER_HOUR;
        let minutes = (diff % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE;
        let seconds = (diff % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND;
        Self {
            days: days.unsigned_abs(),
            hours: narrow(hours),
            minutes: narrow(minutes),
            seconds: narrow(seconds),
        }
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.days == 0 && self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }

    /// Whole milliseconds covered by the decomposition; the sub-second
    /// remainder that was truncated away is not included.
    #[must_use]
    pub fn whole_millis(&self) -> u64 {
        self.days * MILLIS_PER_DAY.unsigned_abs()
            + u64::from(self.hours) * MILLIS_PER_HOUR.unsigned_abs()
            + u64::from(self.minutes) * MILLIS_PER_MINUTE.unsigned_abs()
            + u64::from(self.seconds) * MILLIS_PER_SECOND.unsigned_abs()
    }

    #[must_use]
    pub fn units(&self) -> TimeUnits {
        TimeUnits::from(*self)
    }
}

// Sub-day components are bounded by 24/60, so the fallback is unreachable.
fn narrow(component: i64) -> u32 {
    u32::try_from(component).unwrap_or(0)
}

impl fmt::Display for RemainingDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {:02}:{:02}:{:02}",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}
