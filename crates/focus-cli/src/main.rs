//! `focus` CLI — measure free-time fragmentation in a work week.
//!
//! ## Usage
//!
//! ```sh
//! # Analyze the current week from a calendar snapshot (stdin → stdout)
//! cat calendar.json | focus analyze
//!
//! # Analyze a specific week with a custom work day, writing to a file
//! focus analyze -i calendar.json --week-of 2026-03-18 --day-start 09:00 --day-end 17:30 -o report.json
//!
//! # Repair unsorted/overlapping provider data and keep going on lookup failures
//! focus analyze -i calendar.json --normalize --keep-going
//!
//! # Show the work windows that would be analyzed
//! focus windows --week-of 2026-03-18 --timezone Europe/Berlin
//! ```
//!
//! The snapshot format is `{"busy": [{"start", "end"}], "events": [{"id", "start", "end"}]}`
//! with epoch-second timestamps; `busy` may be omitted to derive it from `events`.

use std::io::{self, Read};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use focus_engine::report::format_epoch;
use focus_engine::{
    current_work_week, work_windows, AnalysisConfig, Analyzer, BusyPeriodSource, EventSource,
    LookupFailurePolicy, StaticCalendar, TimedSource, WeekReport, WorkWindow,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "focus",
    version,
    about = "Find uninterrupted and fragmented free time in a work week"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a calendar snapshot and print the week report as JSON
    Analyze {
        /// Calendar snapshot JSON (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Account whose busy periods are analyzed
        #[arg(long, default_value = "primary")]
        account: String,
        /// Calendar searched for bordering events (defaults to the account)
        #[arg(long)]
        calendar_id: Option<String>,
        #[command(flatten)]
        window: WindowArgs,
        #[command(flatten)]
        tuning: TuningArgs,
    },
    /// Print the work windows of the selected week
    Windows {
        #[command(flatten)]
        window: WindowArgs,
    },
}

#[derive(Args)]
struct WindowArgs {
    /// JSON file with analysis settings; flags override its values
    #[arg(long)]
    config: Option<String>,
    /// Any date in the week to analyze (defaults to the current week)
    #[arg(long, value_name = "YYYY-MM-DD")]
    week_of: Option<NaiveDate>,
    /// Start of the work day
    #[arg(long, value_name = "HH:MM", value_parser = parse_clock)]
    day_start: Option<NaiveTime>,
    /// End of the work day
    #[arg(long, value_name = "HH:MM", value_parser = parse_clock)]
    day_end: Option<NaiveTime>,
    /// IANA time zone the work day is defined in
    #[arg(long)]
    timezone: Option<String>,
}

#[derive(Args)]
struct TuningArgs {
    /// Free gaps shorter than this many minutes count as fragmented
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..=1440))]
    threshold_minutes: Option<i64>,
    /// Minutes of slack when matching meetings to fragment boundaries
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..=1440))]
    tolerance_minutes: Option<i64>,
    /// Sort, clip and merge busy periods instead of rejecting malformed ones
    #[arg(long)]
    normalize: bool,
    /// Record failed event lookups instead of failing the day
    #[arg(long)]
    keep_going: bool,
    /// Analyze the days concurrently
    #[arg(long)]
    parallel: bool,
    /// Give up on a single calendar call after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Analyze {
            input,
            output,
            account,
            calendar_id,
            window,
            tuning,
        } => {
            let mut config = build_config(&window)?;
            apply_tuning(&mut config, &tuning);
            config.validate().context("Invalid analysis settings")?;

            let windows = select_week(&config, window.week_of)?;
            let snapshot = read_input(input.as_deref())?;
            let calendar =
                StaticCalendar::from_json(&snapshot).context("Failed to parse calendar snapshot")?;
            let calendar_id = calendar_id.unwrap_or_else(|| account.clone());

            let report = match config.source_timeout() {
                Some(timeout) => {
                    let shared = Arc::new(calendar);
                    let busy = TimedSource::from_arc(Arc::clone(&shared), timeout);
                    let events = TimedSource::from_arc(shared, timeout);
                    let analyzer = Analyzer::new(config, busy, events, account, calendar_id)?;
                    run_week(&analyzer, &windows, tuning.parallel)
                }
                None => {
                    let analyzer = Analyzer::new(config, &calendar, &calendar, account, calendar_id)?;
                    run_week(&analyzer, &windows, tuning.parallel)
                }
            };

            if report.is_complete() {
                info!(days = report.days.len(), "work week analyzed");
            } else {
                for failure in &report.failures {
                    warn!(date = %failure.date, error = %failure.error, "day not analyzed");
                }
            }

            let json = serde_json::to_string_pretty(&report)?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Windows { window } => {
            let config = build_config(&window)?;
            config.validate().context("Invalid analysis settings")?;
            let tz = config.tz()?;

            let rows: Vec<serde_json::Value> = select_week(&config, window.week_of)?
                .iter()
                .map(|w| {
                    serde_json::json!({
                        "date": w.date,
                        "start": w.start(),
                        "end": w.end(),
                        "start_display": format_epoch(w.start(), &tz),
                        "end_display": format_epoch(w.end(), &tz),
                    })
                })
                .collect();

            let json = serde_json::to_string_pretty(&rows)?;
            write_output(None, &json)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Load settings from `--config` (or defaults) and apply the window flags.
fn build_config(args: &WindowArgs) -> Result<AnalysisConfig> {
    let mut config = match args.config.as_deref() {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse config file: {}", path))?
        }
        None => AnalysisConfig::default(),
    };

    if let Some(start) = args.day_start {
        config.day_start = start;
    }
    if let Some(end) = args.day_end {
        config.day_end = end;
    }
    if let Some(tz) = &args.timezone {
        config.timezone = tz.clone();
    }

    Ok(config)
}

fn apply_tuning(config: &mut AnalysisConfig, tuning: &TuningArgs) {
    if let Some(minutes) = tuning.threshold_minutes {
        config.fragment_threshold_secs = minutes * 60;
    }
    if let Some(minutes) = tuning.tolerance_minutes {
        config.match_tolerance_secs = minutes * 60;
    }
    if tuning.normalize {
        config.normalize_busy = true;
    }
    if tuning.keep_going {
        config.lookup_failure = LookupFailurePolicy::Record;
    }
    if tuning.timeout_secs.is_some() {
        config.source_timeout_secs = tuning.timeout_secs;
    }
}

fn select_week(config: &AnalysisConfig, week_of: Option<NaiveDate>) -> Result<Vec<WorkWindow>> {
    let windows = match week_of {
        Some(date) => work_windows(config, date),
        None => current_work_week(config),
    }
    .context("Failed to compute work windows")?;
    Ok(windows)
}

fn run_week<B, E>(analyzer: &Analyzer<B, E>, windows: &[WorkWindow], parallel: bool) -> WeekReport
where
    B: BusyPeriodSource + Sync,
    E: EventSource + Sync,
{
    info!(days = windows.len(), parallel, "analyzing work week");
    if parallel {
        analyzer.analyze_week_parallel(windows)
    } else {
        analyzer.analyze_week(windows)
    }
}

/// Accept `HH:MM` or `HH:MM:SS`.
fn parse_clock(raw: &str) -> std::result::Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| format!("expected HH:MM, got '{}'", raw))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
