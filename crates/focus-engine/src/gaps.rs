//! Derive free gaps from a work window and its busy periods.
//!
//! The extractor expects busy periods sorted by start, non-overlapping and inside
//! the window; [`validate_busy_periods`] enforces that, and
//! [`normalize_busy_periods`] repairs provider output that does not honor it.

use crate::error::{FocusError, Result};
use crate::interval::TimeInterval;

/// Check that `busy` is sorted, non-overlapping and contained in `window`.
///
/// Touching periods (`next.start == prev.end`) and zero-length periods are allowed.
///
/// # Errors
/// Returns the first violation found, as `InvalidInterval`, `UnsortedBusyPeriods`,
/// `OverlappingBusyPeriods` or `BusyPeriodOutsideWindow`.
pub fn validate_busy_periods(window: &TimeInterval, busy: &[TimeInterval]) -> Result<()> {
    let mut previous: Option<&TimeInterval> = None;

    for (index, period) in busy.iter().enumerate() {
        if period.start > period.end {
            return Err(FocusError::InvalidInterval {
                start: period.start,
                end: period.end,
            });
        }
        if !window.contains(period) {
            return Err(FocusError::BusyPeriodOutsideWindow {
                index,
                start: period.start,
                end: period.end,
                window_start: window.start,
                window_end: window.end,
            });
        }
        if let Some(prev) = previous {
            if period.start < prev.start {
                return Err(FocusError::UnsortedBusyPeriods {
                    index,
                    start: period.start,
                    previous_start: prev.start,
                });
            }
            if period.start < prev.end {
                return Err(FocusError::OverlappingBusyPeriods {
                    index,
                    start: period.start,
                    previous_end: prev.end,
                });
            }
        }
        previous = Some(period);
    }

    Ok(())
}

/// Clip busy periods to the window, sort them and merge overlapping or adjacent ones.
///
/// Periods entirely outside the window and inverted periods are dropped.
/// The output always passes [`validate_busy_periods`].
pub fn normalize_busy_periods(window: &TimeInterval, busy: &[TimeInterval]) -> Vec<TimeInterval> {
    let mut intervals: Vec<TimeInterval> = busy
        .iter()
        .filter(|b| b.start <= b.end && b.start < window.end && b.end > window.start)
        .map(|b| TimeInterval {
            start: b.start.max(window.start),
            end: b.end.min(window.end),
        })
        .collect();

    intervals.sort();

    let mut merged: Vec<TimeInterval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        if let Some(last) = merged.last_mut() {
            if interval.start <= last.end {
                last.end = last.end.max(interval.end);
                continue;
            }
        }
        merged.push(interval);
    }

    merged
}

/// Compute the free intervals of `window` not covered by `busy`.
///
/// With no busy periods the whole window is one free interval. Zero-length
/// gaps are never emitted, so free and busy periods together partition the
/// window exactly.
///
/// # Errors
/// Fails if `busy` violates the ordering/containment precondition (see
/// [`validate_busy_periods`]).
pub fn extract_free_intervals(
    window: &TimeInterval,
    busy: &[TimeInterval],
) -> Result<Vec<TimeInterval>> {
    validate_busy_periods(window, busy)?;

    let mut free = Vec::with_capacity(busy.len() + 1);
    let mut cursor = window.start;

    for period in busy {
        if period.start > cursor {
            free.push(TimeInterval {
                start: cursor,
                end: period.start,
            });
        }
        cursor = period.end;
    }

    // Trailing gap after the last busy period.
    if window.end > cursor {
        free.push(TimeInterval {
            start: cursor,
            end: window.end,
        });
    }

    Ok(free)
}
