//! Countdown Core
//!
//! Platform-agnostic logic for the countdown widget: time-remaining
//! calculation, the periodic refresh driver with change detection, and the
//! state behind the digit flip and progress rings. This crate has no UI or
//! platform-specific dependencies; hosts plug in through [`Clock`] and
//! [`Scheduler`].

pub mod clock;
pub mod config;
pub mod constants;
pub mod driver;
pub mod flip;
pub mod remaining;
pub mod ring;
pub mod scheduler;
pub mod units;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, CountdownConfig, CountdownSettings, parse_target};
pub use driver::{ActiveCountdown, RefreshDriver, Tick, activate};
pub use flip::{FlipAnimator, FlipPhase, FlipView};
pub use remaining::RemainingDuration;
pub use ring::ProgressRing;
pub use scheduler::{ManualScheduler, ManualTimer, Scheduler};
pub use units::{TimeUnit, TimeUnits, UnitLabel};
