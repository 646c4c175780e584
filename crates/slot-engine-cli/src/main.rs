//! `slots` CLI — inspect a driver availability document from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Day states for a month (stdin → stdout)
//! curl -s "$API/api/v1/availability?month=2025-01" | slots month --month 2025-01
//!
//! # Hourly buckets for one day, from a file
//! slots hours --date 2025-01-01 -i availability.json
//!
//! # Hourly buckets before availability has loaded (everything open)
//! slots hours --date 2025-01-01 --no-data
//!
//! # Can a ride be picked up at 10:30Z?
//! slots check --at 2025-01-01T10:30:00Z -i availability.json
//!
//! # Free windows of at least 90 minutes during the working day
//! slots free --from 2025-01-01T08:00:00Z --to 2025-01-01T18:00:00Z --min-minutes 90 -i availability.json
//!
//! # Reject documents with unparseable timestamps instead of skipping them
//! slots --strict month --month 2025-01 -i availability.json
//! ```
//!
//! Logs go to stderr. Set `RUST_LOG` (e.g. `RUST_LOG=slot_engine=debug`) or pass
//! `-v`/`-vv` to see them.

use std::io::{self, Read};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use slot_engine::{AvailabilityResponse, MonthKey, ParseMode};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Ride availability CLI: day states, hourly buckets and pickup checks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Fail on unparseable timestamps instead of skipping the entry
    #[arg(long, global = true)]
    strict: bool,

    /// Output file (writes to stdout if omitted)
    #[arg(short, long, global = true)]
    output: Option<String>,

    /// Increase log verbosity (-v info, -vv debug); overrides RUST_LOG
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every day of a month as free, partial or full
    Month {
        /// Month to summarize, as YYYY-MM
        #[arg(long)]
        month: String,
        /// Availability JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// List the 24 UTC hour buckets of a day with their disabled flag
    Hours {
        /// Day to expand, as YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Availability JSON file (reads from stdin if omitted)
        #[arg(short, long, conflicts_with = "no_data")]
        input: Option<String>,
        /// Compute without availability data (every hour is open)
        #[arg(long)]
        no_data: bool,
    },
    /// Check whether a 60-minute ride can start at the given instant
    Check {
        /// Proposed pickup time (ISO 8601, e.g. 2025-01-01T10:30:00Z or 2025-01-01T12:30+02:00)
        #[arg(long)]
        at: String,
        /// Availability JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// List free windows between two instants
    Free {
        /// Window start (ISO 8601)
        #[arg(long)]
        from: String,
        /// Window end (ISO 8601)
        #[arg(long)]
        to: String,
        /// Only report windows at least this long
        #[arg(long, default_value_t = 0)]
        min_minutes: i64,
        /// Report only the first qualifying window (or null)
        #[arg(long)]
        first: bool,
        /// Availability JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mode = if cli.strict {
        ParseMode::Strict
    } else {
        ParseMode::Lenient
    };

    let json = match cli.command {
        Commands::Month { month, input } => {
            let key: MonthKey = month.parse()?;
            let data = load_availability(input.as_deref(), mode)?;
            let summary = slot_engine::summarize_month(&data, key.first_day());
            info!(month = %key, days = summary.len(), "month summarized");
            to_pretty_json(&summary)?
        }
        Commands::Hours {
            date,
            input,
            no_data,
        } => {
            let day = slot_engine::parse_day(&date)?;
            let data = if no_data {
                None
            } else {
                Some(load_availability(input.as_deref(), mode)?)
            };
            to_pretty_json(&slot_engine::calculate_hours(data.as_ref(), day))?
        }
        Commands::Check { at, input } => {
            let pickup = parse_instant_arg("--at", &at)?;
            let data = load_availability(input.as_deref(), mode)?;
            let check = slot_engine::check_pickup(&data, pickup);
            info!(available = check.available, conflicts = check.conflicts.len(), "pickup checked");
            to_pretty_json(&check)?
        }
        Commands::Free {
            from,
            to,
            min_minutes,
            first,
            input,
        } => {
            let window_start = parse_instant_arg("--from", &from)?;
            let window_end = parse_instant_arg("--to", &to)?;
            if window_start >= window_end {
                anyhow::bail!("--from ({}) must be before --to ({})", from, to);
            }
            let data = load_availability(input.as_deref(), mode)?;
            if first {
                to_pretty_json(&slot_engine::first_free_window(
                    &data,
                    window_start,
                    window_end,
                    min_minutes,
                ))?
            } else {
                let windows: Vec<_> = slot_engine::find_free_windows(&data, window_start, window_end)
                    .into_iter()
                    .filter(|w| w.duration_minutes >= min_minutes)
                    .collect();
                to_pretty_json(&windows)?
            }
        }
    };

    write_output(cli.output.as_deref(), &json)
}

/// Route logs to stderr so stdout stays machine-readable.
///
/// `-v` flags win over `RUST_LOG`; with neither, only warnings are shown.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_availability(path: Option<&str>, mode: ParseMode) -> Result<AvailabilityResponse> {
    let raw = read_input(path)?;
    let data = slot_engine::parse_availability(&raw, mode)
        .with_context(|| format!("Failed to parse availability from {}", path.unwrap_or("stdin")))?;
    info!(
        slots = data.slots.len(),
        bookings = data.bookings.len(),
        "availability loaded"
    );
    Ok(data)
}

fn parse_instant_arg(flag: &str, value: &str) -> Result<DateTime<Utc>> {
    slot_engine::parse_instant(value)
        .with_context(|| format!("Invalid {} value '{}': expected an ISO 8601 timestamp", flag, value))
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    json.push('\n');
    Ok(json)
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
            print!("{}", content);
        }
    }
    Ok(())
}
