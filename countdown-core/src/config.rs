//! Countdown configuration.
//!
//! The target instant and title are explicit values handed to the driver and
//! components at construction; nothing reads a module-level default at tick
//! time.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_TARGET_LOCAL, DEFAULT_TITLE, NAIVE_TARGET_FORMAT};

/// Errors raised while resolving countdown configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("target `{value}` is neither RFC 3339 nor YYYY-MM-DDTHH:MM:SS")]
    InvalidTarget { value: String },
    #[error("local time `{value}` does not exist in the current time zone")]
    NonexistentLocalTime { value: String },
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("config JSON invalid: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialized form, as found in `countdown.json` or a CLI `--config` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownSettings {
    #[serde(default = "CountdownSettings::default_target")]
    pub target: String,
    #[serde(default = "CountdownSettings::default_title")]
    pub title: String,
}

impl CountdownSettings {
    fn default_target() -> String {
        DEFAULT_TARGET_LOCAL.to_string()
    }

    fn default_title() -> String {
        DEFAULT_TITLE.to_string()
    }

    /// Resolve into a validated [`CountdownConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be parsed or the title is blank.
    pub fn resolve(&self) -> Result<CountdownConfig, ConfigError> {
        let target = parse_target(&self.target)?;
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ConfigError::EmptyTitle);
        }
        Ok(CountdownConfig {
            target,
            title: title.to_string(),
        })
    }
}

impl Default for CountdownSettings {
    fn default() -> Self {
        Self {
            target: Self::default_target(),
            title: Self::default_title(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownConfig {
    pub target: DateTime<Utc>,
    pub title: String,
}

impl CountdownConfig {
    #[must_use]
    pub fn new(target: DateTime<Utc>) -> Self {
        Self {
            target,
            title: DEFAULT_TITLE.to_string(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Parse the JSON settings form and resolve it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or any field is invalid.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: CountdownSettings = serde_json::from_str(json)?;
        settings.resolve()
    }

    /// `2025-05-31T20:00:00` in the host's local time zone.
    #[must_use]
    pub fn default_target() -> DateTime<Utc> {
        parse_target(DEFAULT_TARGET_LOCAL).unwrap_or_else(|_| fallback_default_target())
    }
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self::new(Self::default_target())
    }
}

// Only reached if the default wall time falls in a DST gap.
fn fallback_default_target() -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(DEFAULT_TARGET_LOCAL, NAIVE_TARGET_FORMAT)
        .map(|naive| naive.and_utc())
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Parse a target instant.
///
/// RFC 3339 strings carry their own offset; a bare `YYYY-MM-DDTHH:MM:SS` is
/// read as local wall time, taking the earlier instant when a DST fold makes
/// it ambiguous.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidTarget`] for unrecognised input and
/// [`ConfigError::NonexistentLocalTime`] for wall times skipped by DST.
pub fn parse_target(value: &str) -> Result<DateTime<Utc>, ConfigError> {
    let value = value.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(value, NAIVE_TARGET_FORMAT).map_err(|_| {
        ConfigError::InvalidTarget {
            value: value.to_string(),
        }
    })?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| ConfigError::NonexistentLocalTime {
            value: value.to_string(),
        })
}
