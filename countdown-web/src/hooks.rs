//! Hooks tying countdown timers to component lifetimes.
//!
//! Every timer created here is owned by an effect and released by that
//! effect's destructor, so unmounting a component (or changing the value the
//! effect depends on) cancels it.

use std::rc::Rc;

use chrono::{DateTime, Utc};
use countdown_core::constants::{FLIP_SETTLE_MS, FLIP_SWAP_MS};
use countdown_core::{
    Clock, CountdownConfig, FlipAnimator, FlipView, RemainingDuration, Scheduler, SystemClock,
    TimeUnits, activate,
};
use gloo::timers::callback::Timeout;
use yew::prelude::*;

use crate::scheduler::GlooScheduler;

fn now_ms() -> i64 {
    SystemClock.now().timestamp_millis()
}

/// Current remaining time until `target`, republished once per second while
/// the calling component is mounted and only when a unit changes.
#[hook]
pub fn use_countdown(target: DateTime<Utc>) -> Rc<TimeUnits> {
    use_countdown_with(target, GlooScheduler)
}

/// [`use_countdown`] driven by an explicit scheduler. The timer it registers
/// lives exactly as long as the effect: unmounting or a new `target` drops it.
#[hook]
pub fn use_countdown_with<S>(target: DateTime<Utc>, scheduler: S) -> Rc<TimeUnits>
where
    S: Scheduler + 'static,
    S::Handle: 'static,
{
    // Value-compared, so the immediate publication on activation does not
    // re-render when it matches the seeded state.
    let units =
        use_state_eq(|| Rc::new(RemainingDuration::compute(target, SystemClock.now()).units()));
    {
        let units = units.clone();
        use_effect_with(target, move |target| {
            let config = CountdownConfig::new(*target);
            let active = activate(&config, SystemClock, &scheduler, move |published| {
                units.set(published);
            });
            move || active.deactivate()
        });
    }
    Rc::clone(&*units)
}

/// `value`, delayed by `delay_ms` after each change.
#[hook]
pub fn use_settled(value: u64, delay_ms: u32) -> u64 {
    let settled = use_state_eq(|| value);
    {
        let settled = settled.clone();
        use_effect_with(value, move |value| {
            let value = *value;
            let timeout = Timeout::new(delay_ms, move || settled.set(value));
            move || drop(timeout)
        });
    }
    *settled
}

/// Flip transition state for a digit showing `value`.
#[hook]
pub fn use_flip(value: u64) -> FlipView {
    let animator = use_mut_ref(|| FlipAnimator::new(value));
    let view = use_state_eq(|| animator.borrow().view());
    {
        let animator = animator.clone();
        let view = view.clone();
        use_effect_with(value, move |value| {
            let mut timers = Vec::new();
            let (started, current) = {
                let mut flip = animator.borrow_mut();
                let started = flip.observe(*value, now_ms());
                (started && flip.next_deadline().is_some(), flip.view())
            };
            view.set(current);
            if started {
                for delay in [FLIP_SWAP_MS, FLIP_SETTLE_MS] {
                    let animator = animator.clone();
                    let view = view.clone();
                    let delay = u32::try_from(delay).unwrap_or(0);
                    timers.push(Timeout::new(delay, move || {
                        let mut flip = animator.borrow_mut();
                        // A timer that fires a hair early still crosses its boundary.
                        let at = flip.next_deadline().map_or(now_ms(), |d| d.max(now_ms()));
                        flip.advance(at);
                        view.set(flip.view());
                    }));
                }
            }
            move || drop(timers)
        });
    }
    *view
}
