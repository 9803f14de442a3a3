//! Browser timer backing for the refresh driver.

use countdown_core::Scheduler;
use gloo::timers::callback::Interval;

/// Schedules recurring callbacks with `setInterval`; dropping the returned
/// [`Interval`] calls `clearInterval`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooScheduler;

impl Scheduler for GlooScheduler {
    type Handle = Interval;

    fn every(&self, period_ms: u32, mut callback: Box<dyn FnMut()>) -> Interval {
        Interval::new(period_ms, move || callback())
    }
}
