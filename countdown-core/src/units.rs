//! The four displayed units and their fill ratios.

use serde::Serialize;

use crate::constants::{DAYS_MAX, HOURS_MAX, MINUTES_MAX, SECONDS_MAX};
use crate::remaining::RemainingDuration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UnitLabel {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl UnitLabel {
    /// Display order.
    pub const ALL: [Self; 4] = [Self::Days, Self::Hours, Self::Minutes, Self::Seconds];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Days => "DAYS",
            Self::Hours => "HOURS",
            Self::Minutes => "MINUTES",
            Self::Seconds => "SECONDS",
        }
    }

    #[must_use]
    pub const fn max(self) -> u32 {
        match self {
            Self::Days => DAYS_MAX,
            Self::Hours => HOURS_MAX,
            Self::Minutes => MINUTES_MAX,
            Self::Seconds => SECONDS_MAX,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Days => 0,
            Self::Hours => 1,
            Self::Minutes => 2,
            Self::Seconds => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeUnit {
    pub value: u64,
    pub label: UnitLabel,
    pub max: u32,
}

impl TimeUnit {
    #[must_use]
    pub const fn new(label: UnitLabel, value: u64) -> Self {
        Self {
            value,
            label,
            max: label.max(),
        }
    }

    /// `value / max`. Not clamped: more than 365 days yields a ratio above 1.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fill_fraction(&self) -> f64 {
        if self.max == 0 {
            return 0.0;
        }
        self.value as f64 / f64::from(self.max)
    }
}

/// Exactly four units, always in DAYS, HOURS, MINUTES, SECONDS order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeUnits([TimeUnit; 4]);

impl TimeUnits {
    #[must_use]
    pub fn zero() -> Self {
        Self::from(RemainingDuration::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeUnit> {
        self.0.iter()
    }

    #[must_use]
    pub const fn get(&self, label: UnitLabel) -> &TimeUnit {
        &self.0[label.index()]
    }

    #[must_use]
    pub const fn as_array(&self) -> &[TimeUnit; 4] {
        &self.0
    }

    /// Field-by-field value comparison used for change detection.
    #[must_use]
    pub fn same_values(&self, other: &Self) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| a.value == b.value)
    }

    #[must_use]
    pub fn to_remaining(&self) -> RemainingDuration {
        let narrow = |label| u32::try_from(self.get(label).value).unwrap_or(u32::MAX);
        RemainingDuration {
            days: self.get(UnitLabel::Days).value,
            hours: narrow(UnitLabel::Hours),
            minutes: narrow(UnitLabel::Minutes),
            seconds: narrow(UnitLabel::Seconds),
        }
    }
}

impl From<RemainingDuration> for TimeUnits {
    fn from(remaining: RemainingDuration) -> Self {
        Self([
            TimeUnit::new(UnitLabel::Days, remaining.days),
            TimeUnit::new(UnitLabel::Hours, u64::from(remaining.hours)),
            TimeUnit::new(UnitLabel::Minutes, u64::from(remaining.minutes)),
            TimeUnit::new(UnitLabel::Seconds, u64::from(remaining.seconds)),
        ])
    }
}

impl<'a> IntoIterator for &'a TimeUnits {
    type Item = &'a TimeUnit;
    type IntoIter = std::slice::Iter<'a, TimeUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
