//! Last-input-wins merge across overlapping export series
//!
//! Consecutive portal exports overlap, and the later file is a correction or
//! extension of the earlier one rather than an independent reading. Callers
//! supply series in filename order (lexicographic order equals chronological
//! order under the export naming convention), so the most recently supplied
//! series wins every timestamp collision.

use crate::types::UsageRecord;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Merge parsed series into one ascending, instant-unique series.
///
/// Visits series in the supplied order and overwrites on collision, so the
/// last series containing a given instant provides its record. Uniqueness and
/// ascending order fall out of the instant-keyed map.
pub fn merge(series_list: Vec<Vec<UsageRecord>>) -> Vec<UsageRecord> {
    let mut by_instant: BTreeMap<DateTime<Utc>, UsageRecord> = BTreeMap::new();
    for series in series_list {
        for record in series {
            by_instant.insert(record.timestamp, record);
        }
    }
    by_instant.into_values().collect()
}
