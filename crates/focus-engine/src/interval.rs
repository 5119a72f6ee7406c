//! Epoch-second time intervals shared by work windows, busy periods and free gaps.

use serde::{Deserialize, Serialize};

use crate::error::{FocusError, Result};

/// A half-open span of time `[start, end)` in Unix epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: i64,
    pub end: i64,
}

impl TimeInterval {
    /// Build an interval, rejecting `start > end`.
    pub fn new(start: i64, end: i64) -> Result<Self> {
        if start > end {
            return Err(FocusError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn duration_seconds(&self) -> i64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains(&self, other: &TimeInterval) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }
}
