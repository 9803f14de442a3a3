//! Centralized timing and geometry constants for the countdown.
//!
//! The decomposition factors, refresh cadence and animation windows live here
//! so the calculator, driver and presentation layer agree on a single source.

// Decomposition -------------------------------------------------------------
pub const MILLIS_PER_SECOND: i64 = 1_000;
pub const MILLIS_PER_MINUTE: i64 = 60_000;
pub const MILLIS_PER_HOUR: i64 = 3_600_000;
pub const MILLIS_PER_DAY: i64 = 86_400_000;

// Unit maxima (visual fill ratio only) --------------------------------------
pub const DAYS_MAX: u32 = 365;
pub const HOURS_MAX: u32 = 24;
pub const MINUTES_MAX: u32 = 60;
pub const SECONDS_MAX: u32 = 60;

// Refresh driver ------------------------------------------------------------
pub const TICK_PERIOD_MS: u32 = 1_000;

// Digit flip ----------------------------------------------------------------
pub const FLIP_SWAP_MS: i64 = 200;
pub const FLIP_SETTLE_MS: i64 = 400;

// Progress ring -------------------------------------------------------------
pub const RING_RADIUS: f64 = 45.0;
pub const RING_VIEWBOX: u32 = 100;
pub const RING_SETTLE_DELAY_MS: u32 = 100;
pub const RING_TRANSITION_MS: u32 = 1_000;

// Defaults ------------------------------------------------------------------
pub const DEFAULT_TARGET_LOCAL: &str = "2025-05-31T20:00:00";
pub const DEFAULT_TITLE: &str = "COUNTDOWN AMERTA NS 2025";
pub(crate) const NAIVE_TARGET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
