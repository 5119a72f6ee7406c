//! # focus-engine
//!
//! Measures how fragmented the free time in a work week is.
//!
//! Given the busy periods a calendar provider reports for each work day, the
//! engine derives the free gaps, splits them into uninterrupted blocks and
//! short fragments (below 90 minutes by default), and names the meetings that
//! border the fragments as the likely cause.
//!
//! ## Modules
//!
//! - [`workweek`] — Monday–Friday work windows for a reference date
//! - [`gaps`] — Busy-period validation/normalization and free-gap extraction
//! - [`classify`] — Uninterrupted vs. fragmented partition
//! - [`aggregate`] — Whole-minute duration totals
//! - [`matcher`] — Events bordering fragmented gaps
//! - [`source`] — Provider seams (`BusyPeriodSource`, `EventSource`) and an in-memory calendar
//! - [`report`] — Day and week report types
//! - [`analyzer`] — The per-day pipeline tying it together
//! - [`config`] — Analysis parameters
//! - [`error`] — Error types

pub mod aggregate;
pub mod analyzer;
pub mod classify;
pub mod config;
pub mod error;
pub mod gaps;
pub mod interval;
pub mod matcher;
pub mod report;
pub mod source;
pub mod workweek;

pub use aggregate::total_minutes;
pub use analyzer::Analyzer;
pub use classify::{classify_gaps, ClassifiedGaps, GapKind};
pub use config::{AnalysisConfig, FRAGMENT_THRESHOLD_SECS, MATCH_TOLERANCE_SECS, MAX_SETTING_SECS};
pub use error::{FocusError, SourceError};
pub use gaps::{extract_free_intervals, normalize_busy_periods, validate_busy_periods};
pub use interval::TimeInterval;
pub use matcher::{find_unoptimized_events, LookupFailurePolicy, MatchOutcome};
pub use report::{DayReport, WeekReport};
pub use source::{
    BusyPeriodSource, CalendarEvent, EventQuery, EventSource, StaticCalendar, TimedSource,
};
pub use workweek::{current_work_week, work_windows, WorkWindow};
