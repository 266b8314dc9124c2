//! Property-based tests for the reconciliation pipeline invariants.

use chrono::{Duration, TimeZone, Utc};
use meterstat::aggregation::Aggregator;
use meterstat::rolling::rolling_average;
use meterstat::timezone::{Calendar, ZoneCalendar};
use meterstat::types::UsageRecord;
use meterstat::{gap_fill, merge};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Records at quarter-hour offsets from a fixed summer base (no DST edges in
/// range), with deterministic kWh values.
fn records_at(offsets: &BTreeSet<u32>, source: &str) -> Vec<UsageRecord> {
    let cal = ZoneCalendar::default();
    let base = Utc.with_ymd_and_hms(2024, 6, 1, 7, 0, 0).unwrap();
    offsets
        .iter()
        .map(|&k| {
            let instant = base + Duration::minutes(15 * i64::from(k));
            UsageRecord {
                timestamp: instant,
                civil_date: cal.civil_date(instant),
                local_start_time: cal.civil_time(instant),
                import_kwh: f64::from(k % 7) * 0.25,
                source: source.to_string(),
                synthetic: false,
            }
        })
        .collect()
}

fn offsets() -> impl Strategy<Value = BTreeSet<u32>> {
    prop::collection::btree_set(0u32..400, 1..60)
}

proptest! {
    #[test]
    fn merged_output_is_unique_and_ascending(a in offsets(), b in offsets()) {
        let merged = merge::merge(vec![records_at(&a, "a.csv"), records_at(&b, "b.csv")]);

        let expected: BTreeSet<u32> = a.union(&b).copied().collect();
        prop_assert_eq!(merged.len(), expected.len());
        for pair in merged.windows(2) {
            prop_assert!(pair[0].timestamp < pair[1].timestamp);
        }
    }

    #[test]
    fn overlapping_instants_take_the_later_series(a in offsets(), b in offsets()) {
        let merged = merge::merge(vec![records_at(&a, "a.csv"), records_at(&b, "b.csv")]);
        for record in &merged {
            let offset = ((record.timestamp
                - Utc.with_ymd_and_hms(2024, 6, 1, 7, 0, 0).unwrap())
            .num_minutes()
                / 15) as u32;
            let expected = if b.contains(&offset) { "b.csv" } else { "a.csv" };
            prop_assert_eq!(record.source.as_str(), expected);
        }
    }

    #[test]
    fn filled_series_is_contiguous_at_interval_spacing(offsets in offsets()) {
        let cal = ZoneCalendar::default();
        let filled = gap_fill::fill(records_at(&offsets, "a.csv"), &cal);

        prop_assert_eq!(
            filled.len() as u32,
            offsets.last().unwrap() - offsets.first().unwrap() + 1
        );
        for pair in filled.windows(2) {
            prop_assert_eq!(pair[1].timestamp - pair[0].timestamp, Duration::minutes(15));
        }
        // Real records pass through untouched; only gaps are synthetic.
        let synthetic = filled.iter().filter(|r| r.synthetic).count();
        prop_assert_eq!(filled.len(), offsets.len() + synthetic);
    }

    #[test]
    fn aggregation_preserves_total_energy(offsets in offsets()) {
        let cal = ZoneCalendar::default();
        let filled = gap_fill::fill(records_at(&offsets, "a.csv"), &cal);
        let aggregator = Aggregator::new(Arc::new(ZoneCalendar::default()));

        let raw: f64 = filled.iter().map(|r| r.import_kwh).sum();
        let hourly = aggregator.aggregate_hourly(&filled);
        let daily = aggregator.aggregate_daily(&filled);

        let hourly_sum: f64 = hourly.iter().map(|b| b.import_kwh).sum();
        let daily_sum: f64 = daily.iter().map(|b| b.import_kwh).sum();
        prop_assert!((raw - hourly_sum).abs() < 1e-9);
        prop_assert!((raw - daily_sum).abs() < 1e-9);

        // Sample counts fold every interval exactly once.
        let hourly_samples: usize = hourly.iter().map(|b| b.sample_count).sum();
        prop_assert_eq!(hourly_samples, filled.len());
    }

    #[test]
    fn rolling_average_emits_one_point_per_full_window(
        offsets in offsets(),
        window in 2usize..12,
    ) {
        let series = records_at(&offsets, "a.csv");
        let points = rolling_average(&series, window);
        prop_assert_eq!(points.len(), series.len().saturating_sub(window - 1));
    }
}
