//! Core domain types for meterstat
//!
//! This module contains the fundamental types used throughout the meterstat
//! library: interval usage records, aggregation buckets, rolling-average
//! points, and the granularity tags that select between them.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Provenance tag carried by records inserted by the gap filler.
pub const SYNTHETIC_SOURCE: &str = "synthetic-gap-fill";

/// Aggregation granularity of a series
///
/// The raw series is made of 15-minute intervals; hourly and daily views are
/// re-bucketed from it by civil-calendar truncation.
///
/// # Examples
/// ```
/// use meterstat::types::Granularity;
///
/// let g: Granularity = "hourly".parse().unwrap();
/// assert_eq!(g, Granularity::Hourly);
/// assert_eq!(g.to_string(), "hourly");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum Granularity {
    /// Raw 15-minute intervals
    #[value(name = "15min")]
    #[serde(rename = "15min")]
    QuarterHour,
    /// Hourly sums
    #[serde(rename = "hourly")]
    Hourly,
    /// Daily sums
    #[serde(rename = "daily")]
    Daily,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuarterHour => write!(f, "15min"),
            Self::Hourly => write!(f, "hourly"),
            Self::Daily => write!(f, "daily"),
        }
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "15min" => Ok(Self::QuarterHour),
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            _ => Err(format!("Invalid granularity: {s}")),
        }
    }
}

/// One 15-minute interval reading
///
/// The atomic unit of the reconciled series. `timestamp` is the absolute
/// instant and the sort/dedup key; `civil_date` and `local_start_time` are the
/// wall-clock fields in the fixed meter timezone. For rows parsed from a CSV
/// export the wall-clock fields come from the source and `timestamp` is
/// derived from them; for synthetic records it is the other way around.
///
/// # Examples
/// ```
/// use meterstat::types::UsageRecord;
/// use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
///
/// let record = UsageRecord {
///     timestamp: Utc.with_ymd_and_hms(2024, 6, 1, 17, 0, 0).unwrap(),
///     civil_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
///     local_start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
///     import_kwh: 0.42,
///     source: "export_1234_5_2024-06-01_to_2024-06-30.csv".to_string(),
///     synthetic: false,
/// };
/// assert!(!record.synthetic);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Absolute instant of the interval start
    pub timestamp: DateTime<Utc>,
    /// Local calendar date in the meter timezone
    pub civil_date: NaiveDate,
    /// Local wall-clock start time in the meter timezone
    pub local_start_time: NaiveTime,
    /// Imported energy over the interval, in kWh
    pub import_kwh: f64,
    /// Originating file name, or [`SYNTHETIC_SOURCE`]
    pub source: String,
    /// True only for records inserted by the gap filler
    #[serde(default)]
    pub synthetic: bool,
}

/// One hourly or daily aggregation slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateBucket {
    /// Instant of the bucket start (top of hour / local midnight)
    pub timestamp: DateTime<Utc>,
    /// Local calendar date of the bucket
    pub civil_date: NaiveDate,
    /// Bucket-aligned local start time (`HH:00` or midnight)
    pub local_start_time: NaiveTime,
    /// Sum of constituent interval kWh values
    pub import_kwh: f64,
    /// Number of constituent records folded into the bucket (diagnostic only)
    pub sample_count: usize,
}

/// One trailing moving-average sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingAveragePoint {
    /// Instant of the series position the average trails up to
    pub timestamp: DateTime<Utc>,
    /// Mean kWh over the trailing window
    pub avg: f64,
}

/// Uniform instant + kWh view over records and buckets
///
/// Range filtering and rolling averages operate on any granularity's series
/// through this trait, comparing by absolute instant rather than by civil
/// field formatting.
pub trait SeriesPoint {
    /// Absolute instant of the point
    fn instant(&self) -> DateTime<Utc>;
    /// Imported energy at the point, in kWh
    fn import_kwh(&self) -> f64;
}

impl SeriesPoint for UsageRecord {
    fn instant(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn import_kwh(&self) -> f64 {
        self.import_kwh
    }
}

impl SeriesPoint for AggregateBucket {
    fn instant(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn import_kwh(&self) -> f64 {
        self.import_kwh
    }
}
