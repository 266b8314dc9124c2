//! CLI interface for meterstat
//!
//! This module defines the command-line interface using clap: ingest exports
//! into the persisted series, report a granularity's view of it, or clear it.
//!
//! # Example
//!
//! ```bash
//! # Merge a directory of portal exports into the persisted series
//! meterstat ingest ~/Downloads/pge-exports
//!
//! # Daily report for January 2024 with a rolling average
//! meterstat report -g daily --since 2024-01-01 --until 2024-01-31 --rolling
//! ```

use crate::error::{MeterstatError, Result};
use crate::rolling::DEFAULT_ROLLING_WINDOW;
use crate::types::Granularity;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Reconcile utility interval CSV exports into gap-free kWh reports
#[derive(Parser, Debug, Clone)]
#[command(name = "meterstat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Only show warnings and errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Path of the persisted series store (JSON lines)
    #[arg(long, global = true, env = "METERSTAT_STORE")]
    pub store: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Arguments for the report command
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Aggregation granularity
    #[arg(long, short = 'g', value_enum, default_value = "daily")]
    pub granularity: Granularity,

    /// Filter by start date (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub since: Option<String>,

    /// Filter by end date (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub until: Option<String>,

    /// Include the trailing rolling-average series in the report
    #[arg(long)]
    pub rolling: bool,

    /// Rolling-average window, in points of the selected granularity
    #[arg(long, default_value_t = DEFAULT_ROLLING_WINDOW)]
    pub window: usize,
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            granularity: Granularity::Daily,
            since: None,
            until: None,
            rolling: false,
            window: DEFAULT_ROLLING_WINDOW,
        }
    }
}

/// Top-level commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Merge CSV exports into the persisted series
    Ingest {
        /// Export files, or a single directory to scan for *.csv
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Report the reconciled series at a granularity
    Report(ReportArgs),
    /// Empty the persisted series
    Clear,
}

/// Parse a date filter in YYYY-MM-DD format
///
/// # Example
///
/// ```
/// use meterstat::cli::parse_date_filter;
///
/// let date = parse_date_filter("2024-01-15").unwrap();
/// assert_eq!(date.to_string(), "2024-01-15");
/// ```
pub fn parse_date_filter(date_str: &str) -> Result<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| {
        MeterstatError::InvalidDate(format!(
            "Invalid date format '{date_str}', expected YYYY-MM-DD"
        ))
    })
}
