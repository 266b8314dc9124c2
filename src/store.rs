//! Reconciled series state and the persisted record-store boundary
//!
//! [`TimeSeriesStore`] is an immutable value rebuilt wholesale from the
//! authoritative merged series; callers hold and replace it rather than
//! mutating fields in place. [`RecordStore`] is the persistence contract the
//! pipeline commits merged records through, with a JSON-lines file as the
//! production implementation. Writes replace the whole series, so a failed
//! ingestion batch never leaves a partial merge behind.

use crate::aggregation::Aggregator;
use crate::error::Result;
use crate::gap_fill;
use crate::types::{AggregateBucket, UsageRecord};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Per-granularity series state derived from one merged record sequence
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesStore {
    /// Gap-filled 15-minute series
    pub quarter_hour: Vec<UsageRecord>,
    /// Hourly sums
    pub hourly: Vec<AggregateBucket>,
    /// Daily sums
    pub daily: Vec<AggregateBucket>,
    /// Ordered distinct civil dates present in the 15-minute series
    pub civil_dates: Vec<NaiveDate>,
    /// Currently selected inclusive civil-date bounds
    pub selected_range: Option<(NaiveDate, NaiveDate)>,
}

impl TimeSeriesStore {
    /// Rebuild every granularity from the authoritative merged series.
    ///
    /// The selected range defaults to the full span of civil dates present.
    pub fn rebuild(merged: Vec<UsageRecord>, aggregator: &Aggregator) -> Self {
        let quarter_hour = gap_fill::fill(merged, aggregator.calendar());
        let hourly = aggregator.aggregate_hourly(&quarter_hour);
        let daily = aggregator.aggregate_daily(&quarter_hour);

        // quarter_hour ascends by instant, so civil dates ascend too.
        let mut civil_dates: Vec<NaiveDate> =
            quarter_hour.iter().map(|r| r.civil_date).collect();
        civil_dates.dedup();

        let selected_range = match (civil_dates.first(), civil_dates.last()) {
            (Some(&first), Some(&last)) => Some((first, last)),
            _ => None,
        };

        Self {
            quarter_hour,
            hourly,
            daily,
            civil_dates,
            selected_range,
        }
    }

    /// Replace the selected civil-date bounds, returning the new value.
    pub fn with_selected_range(mut self, range: Option<(NaiveDate, NaiveDate)>) -> Self {
        self.selected_range = range;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.quarter_hour.is_empty()
    }
}

/// Persistence contract for the merged record series
///
/// Whole-series replace rather than incremental upsert: readers get the full
/// series, writers commit the full series.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Read the full persisted series.
    async fn get_all(&self) -> Result<Vec<UsageRecord>>;

    /// Replace the persisted series with `records`.
    async fn put_all(&self, records: &[UsageRecord]) -> Result<()>;

    /// Empty the persisted series.
    async fn clear(&self) -> Result<()>;
}

/// JSON-lines file-backed record store
pub struct JsonlRecordStore {
    path: PathBuf,
}

impl JsonlRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the platform data directory.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("meterstat")
            .join("series.jsonl")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordStore for JsonlRecordStore {
    async fn get_all(&self) -> Result<Vec<UsageRecord>> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for (number, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<UsageRecord>(line) {
                Ok(record) => records.push(record),
                Err(e) => warn!(
                    "skipping corrupt line {} in {}: {e}",
                    number + 1,
                    self.path.display()
                ),
            }
        }
        debug!(
            "loaded {} persisted records from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }

    async fn put_all(&self, records: &[UsageRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut body = String::new();
        for record in records {
            body.push_str(&serde_json::to_string(record)?);
            body.push('\n');
        }
        tokio::fs::write(&self.path, body).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
