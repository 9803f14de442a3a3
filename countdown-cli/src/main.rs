mod checks;
mod reports;
mod scheduler;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use countdown_core::{
    CountdownConfig, RemainingDuration, SystemClock, TimeUnits, activate, parse_target,
};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use reports::Snapshot;
use scheduler::TokioScheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// Print the time remaining once and exit
    Once,
    /// Print every published change until interrupted
    Watch,
    /// Run the behaviour checks in virtual time
    Check,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "countdown-cli", version)]
#[command(about = "Headless countdown runner and behaviour checks")]
struct Args {
    /// once (default), watch, or check
    #[arg(long, value_enum, default_value_t = RunMode::Once)]
    mode: RunMode,

    /// Target instant: RFC 3339, or local `YYYY-MM-DDTHH:MM:SS`
    #[arg(long)]
    target: Option<String>,

    /// JSON settings file with `target` and `title`
    #[arg(long)]
    config: Option<PathBuf>,

    /// Heading shown above the countdown
    #[arg(long)]
    title: Option<String>,

    /// Stop watching after this many publications
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Stop watching once the countdown reaches zero
    #[arg(long)]
    exit_on_zero: bool,

    /// Checks to run (comma-separated), check mode only
    #[arg(long, default_value = "all")]
    checks: String,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.report == ReportFormat::Console {
        announce_banner();
    }

    let passed = match args.mode {
        RunMode::Once => run_once(&args)?,
        RunMode::Watch => run_watch(&args)?,
        RunMode::Check => run_check(&args)?,
    };

    if !passed {
        std::process::exit(1);
    }
    Ok(())
}

fn announce_banner() {
    println!("{}", "⏳ Countdown".bright_cyan().bold());
    println!("{}", "============".cyan());
}

fn resolve_config(args: &Args) -> Result<CountdownConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            CountdownConfig::from_json(&json)
                .with_context(|| format!("invalid countdown config in {}", path.display()))?
        }
        None => CountdownConfig::default(),
    };

    if let Some(target) = &args.target {
        config.target = parse_target(target).context("invalid --target")?;
    }
    if let Some(title) = &args.title {
        let title = title.trim();
        if title.is_empty() {
            bail!("--title must not be empty");
        }
        config.title = title.to_string();
    }

    if args.verbose {
        println!("🎯 Target {} ({})", config.target, config.title);
    }
    log::debug!("resolved countdown config {config:?}");
    Ok(config)
}

fn run_once(args: &Args) -> Result<bool> {
    let config = resolve_config(args)?;
    let now = Utc::now();
    let units = RemainingDuration::compute(config.target, now).units();
    let snapshot = Snapshot::new(&config, units, now);

    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report {
        ReportFormat::Json => reports::write_json_line(&mut output_target, &snapshot)?,
        ReportFormat::Console => reports::write_snapshot_console(&mut output_target, &snapshot)?,
    }
    output_target.flush_inner()?;
    Ok(true)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WatchExit {
    Interrupted,
    MaxTicks,
    ReachedZero,
}

fn run_watch(args: &Args) -> Result<bool> {
    let config = resolve_config(args)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the tokio runtime")?;
    let local = tokio::task::LocalSet::new();
    let exit = local.block_on(&runtime, watch(args, &config))?;
    log::info!("watch stopped: {exit:?}");
    Ok(true)
}

async fn watch(args: &Args, config: &CountdownConfig) -> Result<WatchExit> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<TimeUnits>();

    let countdown = activate(config, SystemClock, &TokioScheduler, move |units| {
        // The receiver only goes away once watching has stopped.
        let _ = tx.send(*units);
    });

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut published = 0_u64;
    let exit = loop {
        tokio::select! {
            _ = &mut ctrl_c => break WatchExit::Interrupted,
            // The sender is owned by the live countdown; `recv` never yields `None` here.
            Some(units) = rx.recv() => {
                published += 1;
                let snapshot = Snapshot::new(config, units, Utc::now());
                match args.report {
                    ReportFormat::Json => reports::write_json_line(&mut output_target, &snapshot)?,
                    ReportFormat::Console => {
                        reports::write_tick_console(&mut output_target, published, &snapshot)?;
                    }
                }
                output_target.flush_inner()?;
                if args.exit_on_zero && snapshot.finished {
                    break WatchExit::ReachedZero;
                }
                if args.max_ticks.is_some_and(|max| published >= max) {
                    break WatchExit::MaxTicks;
                }
            }
        }
    };

    countdown.deactivate();
    Ok(exit)
}

fn run_check(args: &Args) -> Result<bool> {
    let start_time = Instant::now();
    let keys: Vec<String> = args
        .checks
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if args.report == ReportFormat::Console {
        println!("{}", "🧪 Running Countdown Checks".bright_yellow().bold());
        println!("{}", "-".repeat(30).yellow());
    }

    let results = checks::run_checks(&keys);
    if args.verbose {
        for result in &results {
            println!("   {} {:?}", result.name.bright_white(), result.duration);
        }
    }

    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report {
        ReportFormat::Json => reports::generate_json_report(&mut output_target, &results)?,
        ReportFormat::Console => {
            reports::generate_console_report(&mut output_target, &results, start_time.elapsed())?;
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }
    output_target.flush_inner()?;

    Ok(results.iter().all(|r| r.passed))
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            mode: RunMode::Once,
            target: None,
            config: None,
            title: None,
            max_ticks: None,
            exit_on_zero: false,
            checks: "all".to_string(),
            report: ReportFormat::Json,
            output: None,
            verbose: false,
        }
    }

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "countdown-main-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn flags_override_the_default_config() {
        let args = Args {
            target: Some("2030-01-01T00:00:00Z".to_string()),
            title: Some("  New Year  ".to_string()),
            ..base_args()
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.target.to_rfc3339(), "2030-01-01T00:00:00+00:00");
        assert_eq!(config.title, "New Year");
    }

    #[test]
    fn config_file_is_read_then_overridden() {
        let path = temp_path("config");
        std::fs::write(
            &path,
            r#"{"target":"2031-06-01T12:00:00Z","title":"From File"}"#,
        )
        .unwrap();
        let args = Args {
            config: Some(path.clone()),
            title: Some("From Flag".to_string()),
            ..base_args()
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.target.to_rfc3339(), "2031-06-01T12:00:00+00:00");
        assert_eq!(config.title, "From Flag");
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn rejects_bad_target_and_blank_title() {
        let args = Args {
            target: Some("next tuesday".to_string()),
            ..base_args()
        };
        assert!(resolve_config(&args).is_err());

        let args = Args {
            title: Some("   ".to_string()),
            ..base_args()
        };
        assert!(resolve_config(&args).is_err());
    }

    #[test]
    fn missing_config_file_reports_the_path() {
        let args = Args {
            config: Some(PathBuf::from("/definitely/not/here.json")),
            ..base_args()
        };
        let err = resolve_config(&args).unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.json"));
    }

    #[test]
    fn watch_stops_after_max_ticks() {
        let path = temp_path("watch");
        let args = Args {
            mode: RunMode::Watch,
            target: Some("2099-01-01T00:00:00Z".to_string()),
            max_ticks: Some(1),
            output: Some(path.clone()),
            ..base_args()
        };
        assert!(run_watch(&args).unwrap());
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        let _ = std::fs::remove_file(path);
    }
}
