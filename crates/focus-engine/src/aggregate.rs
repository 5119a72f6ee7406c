//! Duration totals for classified gap sets.

use crate::interval::TimeInterval;

/// Total duration in seconds.
pub fn total_seconds(intervals: &[TimeInterval]) -> i64 {
    intervals.iter().map(TimeInterval::duration_seconds).sum()
}

/// Total duration in whole minutes.
///
/// Seconds are summed across all intervals first and truncated once: two
/// 90-second gaps total 3 minutes, not 1 + 1.
pub fn total_minutes(intervals: &[TimeInterval]) -> i64 {
    total_seconds(intervals) / 60
}
