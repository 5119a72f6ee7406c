//! Error types for focus-engine operations.

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FocusError {
    #[error("Invalid interval: start {start} is after end {end}")]
    InvalidInterval { start: i64, end: i64 },

    #[error("Busy periods not sorted: period {index} starts at {start}, before previous start {previous_start}")]
    UnsortedBusyPeriods {
        index: usize,
        start: i64,
        previous_start: i64,
    },

    #[error("Busy periods overlap: period {index} starts at {start}, before previous end {previous_end}")]
    OverlappingBusyPeriods {
        index: usize,
        start: i64,
        previous_end: i64,
    },

    #[error("Busy period {index} [{start}, {end}] lies outside work window [{window_start}, {window_end}]")]
    BusyPeriodOutsideWindow {
        index: usize,
        start: i64,
        end: i64,
        window_start: i64,
        window_end: i64,
    },

    #[error("{operation} failed: {source}")]
    Source {
        operation: &'static str,
        #[source]
        source: SourceError,
    },

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Local time {0} does not exist in the configured timezone")]
    NonexistentLocalTime(String),
}

/// Failure reported by a calendar provider client.
///
/// "No matching event" is not a failure; lookups return `Ok(None)` for that.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("source call timed out after {0:?}")]
    Timeout(Duration),
}

pub type Result<T> = std::result::Result<T, FocusError>;
