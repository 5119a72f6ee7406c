//! Report types and assembly.
//!
//! Reports carry the raw epoch values next to human-readable renderings of
//! them; the renderings are derived, never written back into the intervals.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::aggregate::total_minutes;
use crate::classify::ClassifiedGaps;
use crate::interval::TimeInterval;
use crate::matcher::{LookupFailure, MatchOutcome};
use crate::workweek::WorkWindow;

/// Rendering used for slot boundaries, e.g. `2026-03-16 - 09:30:00`.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d - %H:%M:%S";

/// A free slot with its boundaries rendered in the analysis zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotView {
    pub start: i64,
    pub end: i64,
    pub start_display: String,
    pub end_display: String,
}

impl SlotView {
    pub fn new(interval: &TimeInterval, tz: &Tz) -> Self {
        Self {
            start: interval.start,
            end: interval.end,
            start_display: format_epoch(interval.start, tz),
            end_display: format_epoch(interval.end, tz),
        }
    }
}

/// Total minutes and the slots of one gap class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSummary {
    pub minutes: i64,
    pub slots: Vec<SlotView>,
}

impl SlotSummary {
    pub fn new(intervals: &[TimeInterval], tz: &Tz) -> Self {
        Self {
            minutes: total_minutes(intervals),
            slots: intervals.iter().map(|i| SlotView::new(i, tz)).collect(),
        }
    }
}

/// Fragmentation summary for one work day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayReport {
    pub date: NaiveDate,
    pub window: TimeInterval,
    pub uninterrupted: SlotSummary,
    pub fragmented: SlotSummary,
    pub unoptimized_meetings: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lookup_failures: Vec<LookupFailure>,
}

/// A day whose analysis failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayFailure {
    pub date: NaiveDate,
    pub error: String,
}

/// Per-day reports for a week, plus the days that could not be analyzed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekReport {
    pub days: Vec<DayReport>,
    #[serde(default)]
    pub failures: Vec<DayFailure>,
}

impl WeekReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Combine one day's classified gaps and matched events into a report.
pub fn assemble_day_report(
    window: &WorkWindow,
    gaps: &ClassifiedGaps,
    matches: MatchOutcome,
    tz: &Tz,
) -> DayReport {
    DayReport {
        date: window.date,
        window: window.interval,
        uninterrupted: SlotSummary::new(&gaps.uninterrupted, tz),
        fragmented: SlotSummary::new(&gaps.fragmented, tz),
        unoptimized_meetings: matches.event_ids,
        lookup_failures: matches.failures,
    }
}

/// Render an epoch timestamp with [`DISPLAY_FORMAT`] in `tz`.
///
/// Timestamps outside chrono's range fall back to the raw number.
pub fn format_epoch(timestamp: i64, tz: &Tz) -> String {
    match DateTime::from_timestamp(timestamp, 0) {
        Some(utc) => utc.with_timezone(tz).format(DISPLAY_FORMAT).to_string(),
        None => timestamp.to_string(),
    }
}
