use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use colored::Colorize;
use countdown_core::{CountdownConfig, ProgressRing, RemainingDuration, TimeUnits};
use serde::Serialize;

use crate::checks::CheckResult;

/// One observation of the countdown, as printed by `once` and `watch`.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub title: &'a str,
    pub target: String,
    pub observed_at: String,
    pub remaining: RemainingDuration,
    pub units: TimeUnits,
    pub finished: bool,
}

impl<'a> Snapshot<'a> {
    #[must_use]
    pub fn new(config: &'a CountdownConfig, units: TimeUnits, observed_at: DateTime<Utc>) -> Self {
        let remaining = units.to_remaining();
        Self {
            title: &config.title,
            target: config.target.to_rfc3339_opts(SecondsFormat::Secs, true),
            observed_at: observed_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            remaining,
            units,
            finished: remaining.is_zero(),
        }
    }
}

pub fn write_snapshot_console(out: &mut dyn Write, snapshot: &Snapshot<'_>) -> Result<()> {
    writeln!(out, "{}", snapshot.title.bright_white().bold())?;
    writeln!(out, "Target: {}", snapshot.target)?;
    writeln!(out, "Remaining: {}", snapshot.remaining.to_string().bright_cyan())?;
    for unit in &snapshot.units {
        let ring = ProgressRing::new(unit.value, unit.max);
        writeln!(
            out,
            "   {:8} {:>4} / {:<3} {:5.1}%",
            unit.label.as_str(),
            unit.value,
            unit.max,
            ring.percent()
        )?;
    }
    if snapshot.finished {
        writeln!(out, "{}", "⏰ Countdown finished".green().bold())?;
    }
    Ok(())
}

/// Single line per publication for `watch`.
pub fn write_tick_console(out: &mut dyn Write, index: u64, snapshot: &Snapshot<'_>) -> Result<()> {
    let remaining = snapshot.remaining.to_string();
    let remaining = if snapshot.finished {
        remaining.green()
    } else {
        remaining.bright_cyan()
    };
    writeln!(out, "[{index:>4}] {} {remaining}", snapshot.observed_at.dimmed())?;
    Ok(())
}

pub fn write_json_line<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_console_report(
    out: &mut dyn Write,
    results: &[CheckResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Countdown Check Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "==========================".cyan())?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = total - passed;

    writeln!(out, "Total checks: {total}")?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", failed.to_string().red())?;
    if total > 0 {
        #[allow(clippy::cast_precision_loss)]
        let success_rate = (passed as f64 / total as f64) * 100.0;
        writeln!(out, "Success rate: {success_rate:.1}%")?;
    }
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(out, "{status} {}", result.name.bold())?;
        if !result.description.is_empty() {
            writeln!(out, "   {}", result.description)?;
        }
        writeln!(out, "   Time: {:?}", result.duration)?;
        if let Some(failure) = &result.failure {
            writeln!(out, "   • {}", failure.red())?;
        }
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, results: &[CheckResult]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, results)?;
    writeln!(out)?;
    Ok(())
}
