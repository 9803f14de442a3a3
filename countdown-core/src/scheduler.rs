//! Recurring-callback seam.
//!
//! A [`Scheduler`] hands back a handle whose drop cancels the recurring
//! callback, so a timer's lifetime is exactly the lifetime of the value that
//! owns the handle.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::clock::ManualClock;

pub trait Scheduler {
    /// Cancels the recurring callback when dropped.
    type Handle;

    /// Invoke `callback` every `period_ms` until the returned handle is dropped.
    fn every(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> Self::Handle;
}

struct Entry {
    id: u64,
    period_ms: i64,
    due_ms: i64,
    // Taken out while the callback runs.
    callback: Option<Box<dyn FnMut()>>,
}

#[derive(Default)]
struct Registry {
    elapsed_ms: i64,
    next_id: u64,
    entries: Vec<Entry>,
}

/// Deterministic virtual-time scheduler.
///
/// Time only moves when [`ManualScheduler::advance`] is called; due callbacks
/// fire in due-time order with the paired [`ManualClock`] moved to each
/// callback's due instant first.
pub struct ManualScheduler {
    clock: ManualClock,
    registry: Rc<RefCell<Registry>>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            registry: Rc::new(RefCell::new(Registry::default())),
        }
    }

    #[must_use]
    pub fn clock(&self) -> ManualClock {
        self.clock.clone()
    }

    /// Number of callbacks still registered.
    #[must_use]
    pub fn active_timers(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    /// Virtual milliseconds elapsed since construction.
    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        self.registry.borrow().elapsed_ms
    }

    /// Move virtual time forward by `millis`, firing every callback that
    /// falls due on the way. Returns the number of callbacks fired.
    pub fn advance(&self, millis: u64) -> usize {
        let millis = i64::try_from(millis).unwrap_or(i64::MAX);
        let target = self.elapsed_ms().saturating_add(millis);
        let mut fired = 0;
        while let Some((id, mut callback)) = self.take_next_due(target) {
            callback();
            fired += 1;
            self.restore(id, callback);
        }
        let remaining = target - self.elapsed_ms();
        self.clock.advance_ms(remaining);
        self.registry.borrow_mut().elapsed_ms = target;
        fired
    }

    fn take_next_due(&self, limit: i64) -> Option<(u64, Box<dyn FnMut()>)> {
        let mut registry = self.registry.borrow_mut();
        let entry = registry
            .entries
            .iter_mut()
            .filter(|e| e.due_ms <= limit && e.callback.is_some())
            .min_by_key(|e| (e.due_ms, e.id))?;
        let id = entry.id;
        let due = entry.due_ms;
        let callback = entry.callback.take()?;
        entry.due_ms = due.saturating_add(entry.period_ms);
        let step = due - registry.elapsed_ms;
        registry.elapsed_ms = due;
        drop(registry);
        self.clock.advance_ms(step);
        Some((id, callback))
    }

    fn restore(&self, id: u64, callback: Box<dyn FnMut()>) {
        let leftover = {
            let mut registry = self.registry.borrow_mut();
            match registry.entries.iter_mut().find(|e| e.id == id) {
                Some(entry) => {
                    entry.callback = Some(callback);
                    None
                }
                // Cancelled from inside its own callback.
                None => Some(callback),
            }
        };
        drop(leftover);
    }
}

/// Handle returned by [`ManualScheduler::every`].
pub struct ManualTimer {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Drop for ManualTimer {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let removed = {
            let mut registry = registry.borrow_mut();
            let idx = registry.entries.iter().position(|e| e.id == self.id);
            idx.map(|idx| registry.entries.remove(idx))
        };
        // Dropped outside the borrow: the callback may own other timers.
        drop(removed);
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualTimer;

    fn every(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> ManualTimer {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        let period_ms = i64::from(period_ms.max(1));
        let due_ms = registry.elapsed_ms + period_ms;
        registry.entries.push(Entry {
            id,
            period_ms,
            due_ms,
            callback: Some(callback),
        });
        ManualTimer {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Clock;
    use chrono::{TimeZone, Utc};
    use std::cell::Cell;

    fn scheduler() -> ManualScheduler {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        ManualScheduler::new(ManualClock::new(start))
    }

    #[test]
    fn fires_on_each_period_and_moves_clock() {
        let scheduler = scheduler();
        let clock = scheduler.clock();
        let start = clock.now();
        let hits = Rc::new(RefCell::new(Vec::new()));
        let seen = hits.clone();
        let observer = clock.clone();
        let _timer = scheduler.every(
            1_000,
            Box::new(move || seen.borrow_mut().push(observer.now())),
        );
        assert_eq!(scheduler.advance(3_500), 3);
        let offsets: Vec<i64> = hits
            .borrow()
            .iter()
            .map(|t| (*t - start).num_milliseconds())
            .collect();
        assert_eq!(offsets, [1_000, 2_000, 3_000]);
        assert_eq!((clock.now() - start).num_milliseconds(), 3_500);
        assert_eq!(scheduler.advance(500), 1);
    }

    #[test]
    fn dropping_handle_cancels() {
        let scheduler = scheduler();
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let timer = scheduler.every(100, Box::new(move || counter.set(counter.get() + 1)));
        scheduler.advance(250);
        assert_eq!(count.get(), 2);
        drop(timer);
        assert_eq!(scheduler.active_timers(), 0);
        scheduler.advance(1_000);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn callback_may_cancel_itself() {
        let scheduler = scheduler();
        let slot: Rc<RefCell<Option<ManualTimer>>> = Rc::new(RefCell::new(None));
        let count = Rc::new(Cell::new(0));
        let (inner_slot, counter) = (slot.clone(), count.clone());
        let timer = scheduler.every(
            10,
            Box::new(move || {
                counter.set(counter.get() + 1);
                inner_slot.borrow_mut().take();
            }),
        );
        *slot.borrow_mut() = Some(timer);
        scheduler.advance(100);
        assert_eq!(count.get(), 1);
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn handle_outliving_scheduler_is_harmless() {
        let scheduler = scheduler();
        let timer = scheduler.every(10, Box::new(|| {}));
        drop(scheduler);
        drop(timer);
    }
}
