//! Behaviour checks run in virtual time.
//!
//! Every check drives the core engine through `ManualClock` and
//! `ManualScheduler`, so the catalog finishes instantly and never depends on
//! the wall clock.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Result, ensure};
use chrono::{DateTime, TimeDelta, Utc};
use countdown_core::constants::{FLIP_SETTLE_MS, FLIP_SWAP_MS, MILLIS_PER_DAY, TICK_PERIOD_MS};
use countdown_core::{
    ActiveCountdown, CountdownConfig, FlipAnimator, FlipPhase, ManualClock, ManualScheduler,
    ManualTimer, RefreshDriver, RemainingDuration, Tick, TimeUnits, activate,
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub description: String,
    pub passed: bool,
    pub failure: Option<String>,
    #[serde(rename = "duration_us", serialize_with = "as_micros")]
    pub duration: Duration,
}

fn as_micros<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_micros()).unwrap_or(u64::MAX))
}

pub struct Check {
    pub key: &'static str,
    pub description: &'static str,
    run: fn() -> Result<()>,
}

impl Check {
    #[must_use]
    pub fn run(&self) -> CheckResult {
        let started = Instant::now();
        let outcome = (self.run)();
        let duration = started.elapsed();
        if let Err(err) = &outcome {
            log::warn!("check {} failed: {err:#}", self.key);
        }
        CheckResult {
            name: self.key.to_string(),
            description: self.description.to_string(),
            passed: outcome.is_ok(),
            failure: outcome.err().map(|err| format!("{err:#}")),
            duration,
        }
    }
}

#[must_use]
pub fn catalog() -> Vec<Check> {
    vec![
        Check {
            key: "one-of-each",
            description: "1d 1h 1m 1.5s ahead publishes 1/1/1/1",
            run: one_of_each,
        },
        Check {
            key: "past-target",
            description: "a target in the past publishes zeros once and stays there",
            run: past_target,
        },
        Check {
            key: "zero-latch",
            description: "zero stays published when the clock steps back",
            run: zero_latch,
        },
        Check {
            key: "last-minute",
            description: "59,999 ms ahead publishes 0/0/0/59",
            run: last_minute,
        },
        Check {
            key: "deactivate-before-tick",
            description: "deactivating before the first tick stops all publication",
            run: deactivate_before_tick,
        },
        Check {
            key: "decomposition-sweep",
            description: "remaining units stay in range and bracket the true difference",
            run: decomposition_sweep,
        },
        Check {
            key: "change-identity",
            description: "unchanged ticks keep the published value, changed ticks replace it",
            run: change_identity,
        },
        Check {
            key: "timer-leak",
            description: "repeated activate/deactivate leaves no live timers",
            run: timer_leak,
        },
        Check {
            key: "flip-coalescing",
            description: "a change mid-flip retargets to the newest value",
            run: flip_coalescing,
        },
    ]
}

/// Run the named checks, or the whole catalog when `keys` is empty or
/// contains `all`. Unknown keys are reported as failures.
#[must_use]
pub fn run_checks(keys: &[String]) -> Vec<CheckResult> {
    let catalog = catalog();
    if keys.is_empty() || keys.iter().any(|k| k == "all") {
        return catalog.iter().map(Check::run).collect();
    }
    keys.iter()
        .map(|key| {
            catalog
                .iter()
                .find(|check| check.key == key)
                .map_or_else(|| unknown_check(key), Check::run)
        })
        .collect()
}

fn unknown_check(key: &str) -> CheckResult {
    CheckResult {
        name: key.to_string(),
        description: String::new(),
        passed: false,
        failure: Some(format!("unknown check: {key}")),
        duration: Duration::ZERO,
    }
}

struct Harness {
    scheduler: ManualScheduler,
    start: DateTime<Utc>,
    published: Rc<RefCell<Vec<Rc<TimeUnits>>>>,
}

impl Harness {
    fn new() -> Self {
        let start = DateTime::<Utc>::default() + TimeDelta::days(20_000);
        Self {
            scheduler: ManualScheduler::new(ManualClock::new(start)),
            start,
            published: Rc::default(),
        }
    }

    fn activate_in(&self, offset_ms: i64) -> ActiveCountdown<ManualTimer> {
        let config = CountdownConfig::new(self.start + TimeDelta::milliseconds(offset_ms));
        let sink = Rc::clone(&self.published);
        activate(&config, self.scheduler.clock(), &self.scheduler, move |units| {
            sink.borrow_mut().push(units);
        })
    }

    fn publications(&self) -> usize {
        self.published.borrow().len()
    }

    fn latest_values(&self) -> Option<[u64; 4]> {
        self.published.borrow().last().map(|units| values(units))
    }
}

fn values(units: &TimeUnits) -> [u64; 4] {
    let [d, h, m, s] = units.as_array();
    [d.value, h.value, m.value, s.value]
}

fn one_of_each() -> Result<()> {
    let harness = Harness::new();
    let _countdown = harness.activate_in(90_061_500);
    ensure!(harness.publications() == 1, "expected an immediate publication");
    let latest = harness.latest_values();
    ensure!(latest == Some([1, 1, 1, 1]), "published {latest:?}");
    Ok(())
}

fn past_target() -> Result<()> {
    let harness = Harness::new();
    let _countdown = harness.activate_in(-5_000);
    harness.scheduler.advance(3_000);
    ensure!(
        harness.publications() == 1,
        "zero republished {} times",
        harness.publications()
    );
    let latest = harness.latest_values();
    ensure!(latest == Some([0, 0, 0, 0]), "published {latest:?}");
    Ok(())
}

fn zero_latch() -> Result<()> {
    let harness = Harness::new();
    let _countdown = harness.activate_in(2_000);
    harness.scheduler.advance(3_000);
    let latest = harness.latest_values();
    ensure!(latest == Some([0, 0, 0, 0]), "published {latest:?}");

    harness.scheduler.clock().set(harness.start);
    harness.scheduler.advance(u64::from(TICK_PERIOD_MS) * 3);
    let latest = harness.latest_values();
    ensure!(latest == Some([0, 0, 0, 0]), "restarted at {latest:?}");
    Ok(())
}

fn last_minute() -> Result<()> {
    let harness = Harness::new();
    let _countdown = harness.activate_in(59_999);
    let latest = harness.latest_values();
    ensure!(latest == Some([0, 0, 0, 59]), "published {latest:?}");
    Ok(())
}

fn deactivate_before_tick() -> Result<()> {
    let harness = Harness::new();
    let countdown = harness.activate_in(3_600_000);
    countdown.deactivate();
    let fired = harness.scheduler.advance(5_000);
    ensure!(fired == 0, "{fired} callbacks fired after deactivation");
    ensure!(
        harness.publications() == 1,
        "{} publications",
        harness.publications()
    );
    ensure!(
        harness.scheduler.active_timers() == 0,
        "timer still registered"
    );
    Ok(())
}

fn decomposition_sweep() -> Result<()> {
    let samples = (0..2_000_i64)
        .map(|i| i * 7_919 * 61)
        .chain([1, 999, 1_000, 1_001, MILLIS_PER_DAY - 1, MILLIS_PER_DAY, 400 * MILLIS_PER_DAY]);
    for diff in samples {
        let remaining = RemainingDuration::from_millis(diff);
        ensure!(remaining.hours < 24, "{diff}ms gave {} hours", remaining.hours);
        ensure!(remaining.minutes < 60, "{diff}ms gave {} minutes", remaining.minutes);
        ensure!(remaining.seconds < 60, "{diff}ms gave {} seconds", remaining.seconds);
        let whole = i128::from(remaining.whole_millis());
        let diff = i128::from(diff);
        ensure!(
            whole <= diff && diff < whole + 1_000,
            "{diff}ms recomposed to {whole}ms"
        );
    }
    ensure!(
        RemainingDuration::from_millis(-1).is_zero(),
        "negative difference must clamp to zero"
    );
    Ok(())
}

fn change_identity() -> Result<()> {
    let harness = Harness::new();
    let clock = harness.scheduler.clock();
    let mut driver = RefreshDriver::new(harness.start + TimeDelta::milliseconds(10_500), clock.clone());

    let first = driver.tick();
    ensure!(first.is_changed(), "first tick must publish");

    clock.advance_ms(100);
    let second = driver.tick();
    ensure!(!second.is_changed(), "same second reported a change");
    ensure!(
        Rc::ptr_eq(first.units(), second.units()),
        "unchanged tick allocated a new value"
    );

    clock.advance_ms(i64::from(TICK_PERIOD_MS));
    let third = driver.tick();
    let Tick::Changed(units) = &third else {
        anyhow::bail!("crossing a second boundary was not reported");
    };
    ensure!(
        !Rc::ptr_eq(first.units(), units),
        "changed tick reused the old value"
    );
    ensure!(values(units) == [0, 0, 0, 9], "got {:?}", values(units));
    Ok(())
}

fn timer_leak() -> Result<()> {
    let harness = Harness::new();
    for round in 0..100 {
        let countdown = harness.activate_in(86_400_000);
        harness.scheduler.advance(u64::from(TICK_PERIOD_MS));
        ensure!(
            harness.scheduler.active_timers() == 1,
            "round {round}: {} timers live",
            harness.scheduler.active_timers()
        );
        drop(countdown);
    }
    ensure!(
        harness.scheduler.active_timers() == 0,
        "{} timers leaked",
        harness.scheduler.active_timers()
    );
    Ok(())
}

fn flip_coalescing() -> Result<()> {
    let mut flip = FlipAnimator::new(5);
    ensure!(flip.observe(4, 0), "first change did not animate");
    ensure!(flip.observe(3, 100), "mid-flip change was dropped");
    ensure!(flip.view().incoming == 3, "incoming is {}", flip.view().incoming);
    ensure!(flip.view().outgoing == 5, "outgoing is {}", flip.view().outgoing);

    flip.advance(100 + FLIP_SWAP_MS);
    ensure!(flip.phase() == FlipPhase::Entering, "phase {:?}", flip.phase());
    ensure!(flip.view().outgoing == 3, "swap showed {}", flip.view().outgoing);

    flip.advance(100 + FLIP_SETTLE_MS);
    ensure!(flip.phase() == FlipPhase::Idle, "phase {:?}", flip.phase());
    ensure!(flip.value() == 3, "settled on {}", flip.value());
    Ok(())
}
