//! Synthetic filling of missing 15-minute intervals
//!
//! The filler walks the merged series pairwise and inserts zero-usage records
//! at every missing interval boundary strictly between consecutive real
//! records. It reasons purely in elapsed absolute time, which makes DST
//! transitions fall out for free: the spring-forward hour does not exist in
//! absolute time and is left unfilled, and fall-back gaps are measured by
//! instant rather than by the repeated local labels.

use crate::timezone::Calendar;
use crate::types::{SYNTHETIC_SOURCE, UsageRecord};
use chrono::{DateTime, Duration, Utc};

/// Native interval spacing of the source exports, in minutes.
pub const INTERVAL_MINUTES: i64 = 15;

/// Insert synthetic zero-usage records at every missing 15-minute boundary
/// between consecutive real records. The last record is emitted with no
/// trailing synthesis.
pub fn fill(records: Vec<UsageRecord>, calendar: &dyn Calendar) -> Vec<UsageRecord> {
    if records.is_empty() {
        return records;
    }

    let step = Duration::minutes(INTERVAL_MINUTES);
    let mut filled = Vec::with_capacity(records.len());
    let mut iter = records.into_iter().peekable();
    while let Some(record) = iter.next() {
        let current = record.timestamp;
        filled.push(record);
        if let Some(next) = iter.peek() {
            let mut boundary = current + step;
            while boundary < next.timestamp {
                filled.push(synthetic_record(boundary, calendar));
                boundary += step;
            }
        }
    }
    filled
}

fn synthetic_record(instant: DateTime<Utc>, calendar: &dyn Calendar) -> UsageRecord {
    UsageRecord {
        timestamp: instant,
        civil_date: calendar.civil_date(instant),
        local_start_time: calendar.civil_time(instant),
        import_kwh: 0.0,
        source: SYNTHETIC_SOURCE.to_string(),
        synthetic: true,
    }
}
