//! Trailing rolling-average engine
//!
//! A pure sliding window over a series: O(n) total work, O(1) extra space
//! beyond the output. The window is counted in series positions, so the same
//! width means 2.5 hours on the 15-minute series and 10 days on the daily
//! one; that asymmetry is accepted and the width is configurable.

use crate::types::{RollingAveragePoint, SeriesPoint};

/// Default trailing window width, in points of the selected granularity.
pub const DEFAULT_ROLLING_WINDOW: usize = 10;

/// Compute the trailing moving average over a series.
///
/// One point is emitted per series position once at least `window` elements
/// have been seen; the first `window - 1` positions produce no output. An
/// empty series or a window of one or less yields no points.
pub fn rolling_average<T: SeriesPoint>(series: &[T], window: usize) -> Vec<RollingAveragePoint> {
    if series.is_empty() || window <= 1 {
        return Vec::new();
    }

    let mut points = Vec::with_capacity(series.len().saturating_sub(window - 1));
    let mut sum = 0.0;
    for (i, point) in series.iter().enumerate() {
        sum += point.import_kwh();
        if i >= window {
            sum -= series[i - window].import_kwh();
        }
        if i + 1 >= window {
            points.push(RollingAveragePoint {
                timestamp: point.instant(),
                avg: sum / window as f64,
            });
        }
    }
    points
}
