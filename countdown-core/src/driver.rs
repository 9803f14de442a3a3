//! Periodic refresh with change detection.
//!
//! [`RefreshDriver`] recomputes the remaining time on every tick and only
//! hands out a new [`TimeUnits`] allocation when a value actually moved;
//! unchanged ticks return the previously published `Rc`, so observers can
//! compare by pointer. [`activate`] wires a driver to a [`Scheduler`] and
//! returns an [`ActiveCountdown`] guard whose drop stops the ticking.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Utc};

use crate::clock::Clock;
use crate::config::CountdownConfig;
use crate::constants::TICK_PERIOD_MS;
use crate::remaining::RemainingDuration;
use crate::scheduler::Scheduler;
use crate::units::TimeUnits;

/// Outcome of a single tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// At least one unit changed; this is a fresh publication.
    Changed(Rc<TimeUnits>),
    /// Nothing moved; carries the prior publication unchanged.
    Unchanged(Rc<TimeUnits>),
}

impl Tick {
    #[must_use]
    pub const fn units(&self) -> &Rc<TimeUnits> {
        match self {
            Self::Changed(units) | Self::Unchanged(units) => units,
        }
    }

    #[must_use]
    pub const fn is_changed(&self) -> bool {
        matches!(self, Self::Changed(_))
    }
}

pub struct RefreshDriver<C> {
    target: DateTime<Utc>,
    clock: C,
    published: Option<Rc<TimeUnits>>,
    ticks: u64,
    reached_zero: bool,
}

impl<C: Clock> RefreshDriver<C> {
    pub const fn new(target: DateTime<Utc>, clock: C) -> Self {
        Self {
            target,
            clock,
            published: None,
            ticks: 0,
            reached_zero: false,
        }
    }

    /// Recompute against the clock's current instant. The first tick always
    /// publishes. Once zero has been published it stays published, even if
    /// the clock later steps back before the target.
    pub fn tick(&mut self) -> Tick {
        self.ticks += 1;
        if self.reached_zero
            && let Some(prev) = &self.published
        {
            return Tick::Unchanged(Rc::clone(prev));
        }
        let remaining = RemainingDuration::compute(self.target, self.clock.now());
        let fresh = remaining.units();
        log::trace!("countdown tick {}: {remaining}", self.ticks);

        if remaining.is_zero() && !self.reached_zero {
            self.reached_zero = true;
            log::info!("countdown reached zero at tick {}", self.ticks);
        }

        match &self.published {
            Some(prev) if prev.same_values(&fresh) => Tick::Unchanged(Rc::clone(prev)),
            _ => {
                let units = Rc::new(fresh);
                self.published = Some(Rc::clone(&units));
                Tick::Changed(units)
            }
        }
    }

    #[must_use]
    pub fn published(&self) -> Option<Rc<TimeUnits>> {
        self.published.clone()
    }

    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub const fn target(&self) -> DateTime<Utc> {
        self.target
    }
}

/// A running countdown. Dropping it (or calling [`ActiveCountdown::deactivate`])
/// cancels the recurring callback; no tick is delivered afterwards.
pub struct ActiveCountdown<H> {
    handle: Option<H>,
    driver: Rc<RefCell<dyn DriverState>>,
}

// Object-safe view of a driver so the guard is not generic over the clock.
trait DriverState {
    fn published(&self) -> Option<Rc<TimeUnits>>;
    fn ticks(&self) -> u64;
}

impl<C: Clock> DriverState for RefreshDriver<C> {
    fn published(&self) -> Option<Rc<TimeUnits>> {
        Self::published(self)
    }

    fn ticks(&self) -> u64 {
        Self::ticks(self)
    }
}

impl<H> ActiveCountdown<H> {
    #[must_use]
    pub fn published(&self) -> Option<Rc<TimeUnits>> {
        self.driver.borrow().published()
    }

    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.driver.borrow().ticks()
    }

    /// Stop ticking now. Equivalent to dropping the guard.
    pub fn deactivate(self) {
        drop(self);
    }
}

impl<H> Drop for ActiveCountdown<H> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            drop(handle);
            log::debug!("countdown deactivated");
        }
    }
}

/// Start a countdown: compute and publish once immediately, then re-check
/// every [`TICK_PERIOD_MS`] and publish only when a unit changed.
pub fn activate<C, S, F>(
    config: &CountdownConfig,
    clock: C,
    scheduler: &S,
    mut on_publish: F,
) -> ActiveCountdown<S::Handle>
where
    C: Clock + 'static,
    S: Scheduler,
    F: FnMut(Rc<TimeUnits>) + 'static,
{
    let driver = Rc::new(RefCell::new(RefreshDriver::new(config.target, clock)));

    log::debug!("countdown activated for target {}", config.target);
    let initial = driver.borrow_mut().tick();
    on_publish(Rc::clone(initial.units()));

    let tick_driver = Rc::clone(&driver);
    let handle = scheduler.every(
        TICK_PERIOD_MS,
        Box::new(move || {
            let tick = tick_driver.borrow_mut().tick();
            if let Tick::Changed(units) = tick {
                on_publish(units);
            }
        }),
    );

    ActiveCountdown {
        handle: Some(handle),
        driver,
    }
}
