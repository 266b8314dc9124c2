//! Aggregation module for re-bucketing the 15-minute series
//!
//! Hourly and daily views are grouped by civil-calendar truncation of the
//! local wall-clock fields, not by fixed 60- or 1440-minute absolute windows.
//! The distinction matters on DST-transition days, where a civil day holds 92
//! or 100 intervals instead of 96 and the bucket set reflects the local
//! calendar rather than an absolute grid.
//!
//! # Examples
//!
//! ```
//! use meterstat::aggregation::Aggregator;
//! use meterstat::timezone::ZoneCalendar;
//! use std::sync::Arc;
//!
//! let aggregator = Aggregator::new(Arc::new(ZoneCalendar::default()));
//! let hourly = aggregator.aggregate_hourly(&[]);
//! assert!(hourly.is_empty());
//! ```

use crate::timezone::Calendar;
use crate::types::{AggregateBucket, UsageRecord};
use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Accumulator for one bucket
#[derive(Default)]
struct BucketAccumulator {
    kwh: f64,
    samples: usize,
}

impl BucketAccumulator {
    fn add(&mut self, record: &UsageRecord) {
        self.kwh += record.import_kwh;
        self.samples += 1;
    }
}

/// Main aggregation engine
///
/// Holds the calendar used to resolve bucket-start instants so that hourly
/// and daily bucket timestamps stay consistent with record resolution.
pub struct Aggregator {
    calendar: Arc<dyn Calendar>,
}

impl Aggregator {
    /// Create a new Aggregator
    pub fn new(calendar: Arc<dyn Calendar>) -> Self {
        Self { calendar }
    }

    /// The calendar bucket instants are resolved against
    pub fn calendar(&self) -> &dyn Calendar {
        self.calendar.as_ref()
    }

    /// Bucket the 15-minute series by `(civil date, local hour)`.
    ///
    /// The bucket instant is the resolved instant of that date at `HH:00`
    /// local. Output is ascending by instant.
    pub fn aggregate_hourly(&self, records: &[UsageRecord]) -> Vec<AggregateBucket> {
        let mut buckets: BTreeMap<(NaiveDate, u32), BucketAccumulator> = BTreeMap::new();
        for record in records {
            buckets
                .entry((record.civil_date, record.local_start_time.hour()))
                .or_default()
                .add(record);
        }

        let mut out: Vec<AggregateBucket> = buckets
            .into_iter()
            .map(|((date, hour), acc)| {
                let start = NaiveTime::from_hms_opt(hour, 0, 0)
                    .expect("hour comes from a valid wall-clock time");
                self.bucket(date, start, acc)
            })
            .collect();
        out.sort_by_key(|b| b.timestamp);
        out
    }

    /// Bucket the 15-minute series by civil date alone.
    ///
    /// The bucket instant is local midnight of the date. Output is ascending
    /// by instant.
    pub fn aggregate_daily(&self, records: &[UsageRecord]) -> Vec<AggregateBucket> {
        let mut buckets: BTreeMap<NaiveDate, BucketAccumulator> = BTreeMap::new();
        for record in records {
            buckets.entry(record.civil_date).or_default().add(record);
        }

        let mut out: Vec<AggregateBucket> = buckets
            .into_iter()
            .map(|(date, acc)| self.bucket(date, NaiveTime::MIN, acc))
            .collect();
        out.sort_by_key(|b| b.timestamp);
        out
    }

    fn bucket(&self, date: NaiveDate, start: NaiveTime, acc: BucketAccumulator) -> AggregateBucket {
        AggregateBucket {
            timestamp: self.calendar.resolve_instant(date, start),
            civil_date: date,
            local_start_time: start,
            import_kwh: acc.kwh,
            sample_count: acc.samples,
        }
    }
}

/// Report footer totals for a series view
#[derive(Debug, Default, Clone, Serialize)]
pub struct Totals {
    /// Sum of kWh over the view
    pub total_kwh: f64,
    /// Number of points in the view
    pub points: usize,
    /// How many of those are synthetic gap fills (15-minute views only)
    pub synthetic_points: usize,
}

impl Totals {
    pub fn from_records(records: &[UsageRecord]) -> Self {
        let mut totals = Self {
            points: records.len(),
            ..Self::default()
        };
        for record in records {
            totals.total_kwh += record.import_kwh;
            if record.synthetic {
                totals.synthetic_points += 1;
            }
        }
        totals
    }

    pub fn from_buckets(buckets: &[AggregateBucket]) -> Self {
        let mut totals = Self {
            points: buckets.len(),
            ..Self::default()
        };
        for bucket in buckets {
            totals.total_kwh += bucket.import_kwh;
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timezone::ZoneCalendar;
    use chrono::{TimeZone, Utc};

    fn aggregator() -> Aggregator {
        Aggregator::new(Arc::new(ZoneCalendar::default()))
    }

    fn quarter_hours(date: NaiveDate, from_hour: u32, count: usize, kwh: f64) -> Vec<UsageRecord> {
        let cal = ZoneCalendar::default();
        (0..count)
            .map(|i| {
                let minutes = from_hour * 60 + 15 * i as u32;
                let time = NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap();
                UsageRecord {
                    timestamp: cal.resolve_instant(date, time),
                    civil_date: date,
                    local_start_time: time,
                    import_kwh: kwh,
                    source: "a.csv".to_string(),
                    synthetic: false,
                }
            })
            .collect()
    }

    #[test]
    fn test_hourly_bucketing_sums_and_counts() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        // 10:00..11:30 -> one full hour and one half hour
        let records = quarter_hours(date, 10, 6, 0.25);

        let hourly = aggregator().aggregate_hourly(&records);
        assert_eq!(hourly.len(), 2);

        assert_eq!(hourly[0].sample_count, 4);
        assert_eq!(hourly[0].import_kwh, 1.0);
        assert_eq!(
            hourly[0].local_start_time,
            NaiveTime::from_hms_opt(10, 0, 0).unwrap()
        );
        assert_eq!(
            hourly[0].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 15, 18, 0, 0).unwrap()
        );

        assert_eq!(hourly[1].sample_count, 2);
        assert_eq!(hourly[1].import_kwh, 0.5);
    }

    #[test]
    fn test_daily_bucket_at_local_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let records = quarter_hours(date, 10, 8, 0.5);

        let daily = aggregator().aggregate_daily(&records);
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].import_kwh, 4.0);
        assert_eq!(daily[0].sample_count, 8);
        assert_eq!(daily[0].local_start_time, NaiveTime::MIN);
        // Midnight PST resolves to 08:00 UTC.
        assert_eq!(
            daily[0].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_buckets_span_days_in_order() {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
        let mut records = quarter_hours(d2, 9, 4, 1.0);
        records.extend(quarter_hours(d1, 22, 4, 1.0));
        records.sort_by_key(|r| r.timestamp);

        let daily = aggregator().aggregate_daily(&records);
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].civil_date, d1);
        assert_eq!(daily[1].civil_date, d2);
        assert!(daily[0].timestamp < daily[1].timestamp);
    }

    #[test]
    fn test_sum_preserved_across_granularities() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let records = quarter_hours(date, 0, 96, 0.3);
        let agg = aggregator();

        let raw_sum: f64 = records.iter().map(|r| r.import_kwh).sum();
        let hourly_sum: f64 = agg.aggregate_hourly(&records).iter().map(|b| b.import_kwh).sum();
        let daily_sum: f64 = agg.aggregate_daily(&records).iter().map(|b| b.import_kwh).sum();

        assert!((raw_sum - hourly_sum).abs() < 1e-9);
        assert!((raw_sum - daily_sum).abs() < 1e-9);
    }

    #[test]
    fn test_spring_forward_day_has_23_hourly_buckets() {
        // 2024-03-10 has 92 intervals; the 02:xx hour does not exist.
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let cal = ZoneCalendar::default();
        let mut records = Vec::new();
        for hour in (0..24).filter(|h| *h != 2) {
            for quarter in 0..4 {
                let time = NaiveTime::from_hms_opt(hour, quarter * 15, 0).unwrap();
                records.push(UsageRecord {
                    timestamp: cal.resolve_instant(date, time),
                    civil_date: date,
                    local_start_time: time,
                    import_kwh: 0.25,
                    source: "a.csv".to_string(),
                    synthetic: false,
                });
            }
        }
        assert_eq!(records.len(), 92);

        let hourly = aggregator().aggregate_hourly(&records);
        assert_eq!(hourly.len(), 23);
        assert!(hourly.iter().all(|b| b.sample_count == 4));
    }

    #[test]
    fn test_totals() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let mut records = quarter_hours(date, 10, 4, 0.5);
        records[2].synthetic = true;
        records[2].import_kwh = 0.0;

        let totals = Totals::from_records(&records);
        assert_eq!(totals.points, 4);
        assert_eq!(totals.synthetic_points, 1);
        assert!((totals.total_kwh - 1.5).abs() < 1e-9);

        let buckets = aggregator().aggregate_hourly(&records);
        let totals = Totals::from_buckets(&buckets);
        assert_eq!(totals.points, 1);
        assert_eq!(totals.synthetic_points, 0);
    }
}
