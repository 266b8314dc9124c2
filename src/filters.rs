//! Range filtering for reconciled series
//!
//! Restricts a series to an inclusive civil-date window. Bounds resolve to
//! local midnights and records are compared by absolute instant, which keeps
//! the filter correct across granularities whose bucket instants are not
//! midnight-aligned.
//!
//! # Examples
//!
//! ```
//! use meterstat::filters::RangeFilter;
//! use chrono::NaiveDate;
//!
//! let filter = RangeFilter::new()
//!     .with_since(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
//!     .with_until(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
//! ```

use crate::timezone::Calendar;
use crate::types::SeriesPoint;
use chrono::NaiveDate;

/// Inclusive civil-date window over a series
///
/// Both bounds are optional; an absent bound leaves that side open.
#[derive(Debug, Default, Clone, Copy)]
pub struct RangeFilter {
    /// Start date (inclusive)
    pub since: Option<NaiveDate>,
    /// End date (inclusive)
    pub until: Option<NaiveDate>,
}

impl RangeFilter {
    /// Create a filter with no bounds
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start date
    pub fn with_since(mut self, date: NaiveDate) -> Self {
        self.since = Some(date);
        self
    }

    /// Set the end date
    pub fn with_until(mut self, date: NaiveDate) -> Self {
        self.until = Some(date);
        self
    }

    /// Restrict an instant-ascending series to the window.
    ///
    /// The start bound is local midnight of `since` (inclusive); the end
    /// bound is local midnight of the day after `until` (exclusive), so the
    /// end date itself is fully included at every granularity.
    pub fn slice<'a, T: SeriesPoint>(
        &self,
        series: &'a [T],
        calendar: &dyn Calendar,
    ) -> &'a [T] {
        let lower = match self.since {
            Some(date) => {
                let start = calendar.local_midnight(date);
                series.partition_point(|p| p.instant() < start)
            }
            None => 0,
        };
        let upper = match self.until.and_then(|date| date.succ_opt()) {
            Some(after) => {
                let end = calendar.local_midnight(after);
                series.partition_point(|p| p.instant() < end)
            }
            None => series.len(),
        };
        &series[lower..upper.max(lower)]
    }
}
