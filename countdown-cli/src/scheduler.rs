use std::time::Duration;

use countdown_core::Scheduler;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Recurring callbacks on the current `LocalSet`.
///
/// # Panics
///
/// `every` panics when called outside a `tokio::task::LocalSet`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

/// Aborts the interval task when dropped.
#[derive(Debug)]
pub struct TokioTimer(JoinHandle<()>);

impl Drop for TokioTimer {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl Scheduler for TokioScheduler {
    type Handle = TokioTimer;

    fn every(&self, period_ms: u32, mut callback: Box<dyn FnMut()>) -> TokioTimer {
        let period = Duration::from_millis(u64::from(period_ms.max(1)));
        let task = tokio::task::spawn_local(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                callback();
            }
        });
        TokioTimer(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[tokio::test(start_paused = true)]
    async fn fires_every_period_until_dropped() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let count = Rc::new(Cell::new(0_u32));
                let counter = Rc::clone(&count);
                let timer =
                    TokioScheduler.every(1_000, Box::new(move || counter.set(counter.get() + 1)));

                tokio::time::sleep(Duration::from_millis(3_500)).await;
                assert_eq!(count.get(), 3);

                drop(timer);
                tokio::time::sleep(Duration::from_millis(5_000)).await;
                assert_eq!(count.get(), 3);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn first_call_waits_one_period() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let count = Rc::new(Cell::new(0_u32));
                let counter = Rc::clone(&count);
                let _timer =
                    TokioScheduler.every(1_000, Box::new(move || counter.set(counter.get() + 1)));

                tokio::time::sleep(Duration::from_millis(999)).await;
                assert_eq!(count.get(), 0);
                tokio::time::sleep(Duration::from_millis(2)).await;
                assert_eq!(count.get(), 1);
            })
            .await;
    }
}
