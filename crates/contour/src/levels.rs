//! Contour level selection.

use dem_common::{ContourError, ContourResult};

use crate::decode::ElevationStats;

/// Upper bound on the number of levels produced for one grid.
pub const MAX_LEVELS: i64 = 100_000;

/// Largest level index whose product with the interval stays exact.
const MAX_LEVEL_INDEX: f64 = (1u64 << 53) as f64;

/// Every multiple of `interval` in `[min, max]`, ascending.
///
/// Levels are computed as `i * interval` for integer `i` rather than by
/// repeated addition, so they do not drift. An empty range (`min > max`, or
/// no multiple inside it) yields an empty list.
pub fn select_thresholds(min: f64, max: f64, interval: f64) -> ContourResult<Vec<f64>> {
    if !(interval.is_finite() && interval > 0.0) {
        return Err(ContourError::invalid_argument(format!(
            "interval must be a positive number, got {}",
            interval
        )));
    }
    if !(min.is_finite() && max.is_finite()) {
        return Err(ContourError::invalid_argument(format!(
            "elevation range must be finite, got [{}, {}]",
            min, max
        )));
    }

    let lo = (min / interval).ceil();
    let hi = (max / interval).floor();
    if lo > hi {
        return Ok(vec![]);
    }
    // Count in f64 so huge quotients cannot overflow the integer range.
    if !(hi - lo < MAX_LEVELS as f64) {
        return Err(ContourError::invalid_argument(format!(
            "interval {} over [{}, {}] yields more than {} levels",
            interval, min, max, MAX_LEVELS
        )));
    }
    if lo.abs() > MAX_LEVEL_INDEX || hi.abs() > MAX_LEVEL_INDEX {
        return Err(ContourError::invalid_argument(format!(
            "interval {} is too small for elevations [{}, {}]",
            interval, min, max
        )));
    }
    let (lo, hi) = (lo as i64, hi as i64);

    Ok((lo..=hi).map(|i| i as f64 * interval).collect())
}

/// Levels for a grid's stats; no stats (no valid samples) means no levels.
pub fn thresholds_for_stats(
    stats: Option<ElevationStats>,
    interval: f64,
) -> ContourResult<Vec<f64>> {
    match stats {
        Some(s) => select_thresholds(s.min, s.max, interval),
        None => {
            if !(interval.is_finite() && interval > 0.0) {
                return Err(ContourError::invalid_argument(format!(
                    "interval must be a positive number, got {}",
                    interval
                )));
            }
            Ok(vec![])
        }
    }
}
