//! meterstat - Reconcile utility interval CSV exports into gap-free kWh reports
//!
//! This library provides functionality to:
//! - Parse interval CSV exports from a utility billing portal, preamble and all
//! - Resolve local wall-clock fields to absolute instants in a fixed timezone
//! - Merge overlapping exports with last-input-wins deduplication
//! - Fill missing 15-minute intervals with synthetic zero-usage records
//! - Aggregate into hourly and daily views by civil-calendar truncation
//! - Filter by civil-date range and compute trailing rolling averages
//!
//! # Examples
//!
//! ```no_run
//! use meterstat::{
//!     aggregation::Aggregator,
//!     data_loader::ExportLoader,
//!     merge,
//!     store::TimeSeriesStore,
//!     timezone::ZoneCalendar,
//! };
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> meterstat::Result<()> {
//! let calendar = Arc::new(ZoneCalendar::default());
//! let loader = ExportLoader::from_dir(Path::new("exports"))?;
//! let series_list = loader.load(calendar.as_ref()).await?;
//!
//! let aggregator = Aggregator::new(calendar);
//! let merged = merge::merge(series_list);
//! let store = TimeSeriesStore::rebuild(merged, &aggregator);
//! println!("{} daily buckets", store.daily.len());
//! # Ok(())
//! # }
//! ```

pub mod aggregation;
pub mod cli;
pub mod data_loader;
pub mod error;
pub mod filters;
pub mod gap_fill;
pub mod ingest;
pub mod merge;
pub mod output;
pub mod rolling;
pub mod store;
pub mod timezone;
pub mod types;

// Re-export commonly used types
pub use error::{MeterstatError, Result};
pub use types::{AggregateBucket, Granularity, RollingAveragePoint, SeriesPoint, UsageRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
