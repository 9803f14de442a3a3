use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use countdown_core::{
    Clock, CountdownConfig, ManualClock, ManualScheduler, RefreshDriver, RemainingDuration,
    TimeUnits, UnitLabel, activate,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 29, 18, 30, 0).unwrap()
}

fn values(units: &TimeUnits) -> [u64; 4] {
    [
        units.get(UnitLabel::Days).value,
        units.get(UnitLabel::Hours).value,
        units.get(UnitLabel::Minutes).value,
        units.get(UnitLabel::Seconds).value,
    ]
}

#[test]
fn one_day_one_hour_one_minute_one_second() {
    let target = now() + Duration::milliseconds(90_061_000);
    let units = RemainingDuration::compute(target, now()).units();
    assert_eq!(values(&units), [1, 1, 1, 1]);
}

#[test]
fn already_past_target_is_all_zero() {
    let target = now() - Duration::milliseconds(5_000);
    let units = RemainingDuration::compute(target, now()).units();
    assert_eq!(values(&units), [0, 0, 0, 0]);
}

#[test]
fn just_under_a_minute() {
    let target = now() + Duration::milliseconds(59_999);
    let units = RemainingDuration::compute(target, now()).units();
    assert_eq!(values(&units), [0, 0, 0, 59]);
}

#[test]
fn activate_then_deactivate_publishes_exactly_once() {
    let scheduler = ManualScheduler::new(ManualClock::new(now()));
    let config = CountdownConfig::new(now() + Duration::days(2));
    let publications = Rc::new(RefCell::new(0_u32));
    let counter = Rc::clone(&publications);

    let active = activate(&config, scheduler.clock(), &scheduler, move |_| {
        *counter.borrow_mut() += 1;
    });
    active.deactivate();

    scheduler.advance(10_000);
    assert_eq!(*publications.borrow(), 1);
    assert_eq!(scheduler.active_timers(), 0);
}

#[test]
fn dropping_guard_on_early_return_releases_timer() {
    fn mount_and_bail(scheduler: &ManualScheduler) -> Result<(), &'static str> {
        let config = CountdownConfig::new(now() + Duration::minutes(5));
        let _active = activate(&config, scheduler.clock(), scheduler, |_| {});
        Err("owning context failed after activation")
    }

    let scheduler = ManualScheduler::new(ManualClock::new(now()));
    assert!(mount_and_bail(&scheduler).is_err());
    assert_eq!(scheduler.active_timers(), 0);
}

#[test]
fn every_published_value_is_a_fresh_allocation() {
    let scheduler = ManualScheduler::new(ManualClock::new(now()));
    let config = CountdownConfig::new(now() + Duration::milliseconds(65_250));
    let published: Rc<RefCell<Vec<Rc<TimeUnits>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&published);
    let _active = activate(&config, scheduler.clock(), &scheduler, move |units| {
        sink.borrow_mut().push(units);
    });

    scheduler.advance(70_000);
    let published = published.borrow();
    // 65 distinct seconds counted down plus the initial value.
    assert_eq!(published.len(), 66);
    for pair in published.windows(2) {
        assert!(!pair[0].same_values(&pair[1]));
        assert!(!Rc::ptr_eq(&pair[0], &pair[1]));
    }
    assert_eq!(values(published.last().unwrap()), [0, 0, 0, 0]);
}

#[test]
fn driver_tracks_wall_clock_jumps() {
    let clock = ManualClock::new(now());
    let mut driver = RefreshDriver::new(now() + Duration::hours(3), clock.clone());
    assert_eq!(values(driver.tick().units()), [0, 3, 0, 0]);
    clock.set(clock.now() + Duration::minutes(90));
    assert_eq!(values(driver.tick().units()), [0, 1, 30, 0]);
    clock.set(now() + Duration::days(1));
    assert_eq!(values(driver.tick().units()), [0, 0, 0, 0]);

    // Zero never resets, even when the clock is wound back before the target.
    clock.set(now());
    let tick = driver.tick();
    assert!(!tick.is_changed());
    assert_eq!(values(tick.units()), [0, 0, 0, 0]);
}
