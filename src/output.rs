//! Output formatting module for meterstat
//!
//! Formatters render a granularity's filtered view and its rolling-average
//! series either as an ASCII table for terminals or as JSON for machine
//! consumption. An empty view is a valid "no data in range" state, not an
//! error.

use crate::aggregation::Totals;
use crate::types::{AggregateBucket, RollingAveragePoint, UsageRecord};
use prettytable::{Table, format, row};
use serde_json::json;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format a 15-minute record view with totals
    fn format_records(&self, records: &[UsageRecord], totals: &Totals) -> String;

    /// Format an hourly or daily bucket view with totals
    fn format_buckets(&self, buckets: &[AggregateBucket], totals: &Totals) -> String;

    /// Format a rolling-average series
    fn format_rolling(&self, points: &[RollingAveragePoint]) -> String;
}

/// Table formatter for human-readable terminal output
pub struct TableFormatter;

impl TableFormatter {
    fn format_kwh(kwh: f64) -> String {
        format!("{kwh:.3}")
    }
}

impl OutputFormatter for TableFormatter {
    fn format_records(&self, records: &[UsageRecord], totals: &Totals) -> String {
        if records.is_empty() {
            return "no data in selected range".to_string();
        }

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> "Date", b -> "Start", b -> "kWh", b -> "Source"]);

        for record in records {
            table.add_row(row![
                record.civil_date.format("%Y-%m-%d"),
                record.local_start_time.format("%H:%M"),
                r -> Self::format_kwh(record.import_kwh),
                record.source
            ]);
        }
        table.add_row(row![
            b -> "TOTAL",
            b -> format!("{} intervals", totals.points),
            br -> Self::format_kwh(totals.total_kwh),
            b -> format!("{} synthetic", totals.synthetic_points)
        ]);
        table.to_string()
    }

    fn format_buckets(&self, buckets: &[AggregateBucket], totals: &Totals) -> String {
        if buckets.is_empty() {
            return "no data in selected range".to_string();
        }

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> "Date", b -> "Start", b -> "kWh", b -> "Samples"]);

        for bucket in buckets {
            table.add_row(row![
                bucket.civil_date.format("%Y-%m-%d"),
                bucket.local_start_time.format("%H:%M"),
                r -> Self::format_kwh(bucket.import_kwh),
                r -> bucket.sample_count
            ]);
        }
        table.add_row(row![
            b -> "TOTAL",
            b -> format!("{} buckets", totals.points),
            br -> Self::format_kwh(totals.total_kwh),
            ""
        ]);
        table.to_string()
    }

    fn format_rolling(&self, points: &[RollingAveragePoint]) -> String {
        if points.is_empty() {
            return "no rolling-average points (series shorter than window)".to_string();
        }

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> "Through (UTC)", b -> "Avg kWh"]);
        for point in points {
            table.add_row(row![
                point.timestamp.format("%Y-%m-%d %H:%M"),
                r -> Self::format_kwh(point.avg)
            ]);
        }
        table.to_string()
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_records(&self, records: &[UsageRecord], totals: &Totals) -> String {
        json!({ "series": records, "totals": totals }).to_string()
    }

    fn format_buckets(&self, buckets: &[AggregateBucket], totals: &Totals) -> String {
        json!({ "series": buckets, "totals": totals }).to_string()
    }

    fn format_rolling(&self, points: &[RollingAveragePoint]) -> String {
        json!({ "rolling": points }).to_string()
    }
}

/// Get the appropriate formatter for the output mode
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(TableFormatter)
    }
}
