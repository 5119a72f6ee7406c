//! Analysis parameters: the daily work window, thresholds and failure policy.

use std::time::Duration;

use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{FocusError, Result};
use crate::matcher::LookupFailurePolicy;

/// Free gaps shorter than this are fragments (90 minutes).
pub const FRAGMENT_THRESHOLD_SECS: i64 = 90 * 60;

/// Slack allowed between a fragment boundary and a bordering event (5 minutes).
pub const MATCH_TOLERANCE_SECS: i64 = 5 * 60;

/// Upper bound for the threshold and tolerance settings (one day).
pub const MAX_SETTING_SECS: i64 = 24 * 60 * 60;

/// Read-only configuration shared by every day of an analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Clock time the work day begins.
    pub day_start: NaiveTime,
    /// Clock time the work day ends.
    pub day_end: NaiveTime,
    /// IANA zone the clock times are read in (e.g. "Europe/Berlin").
    pub timezone: String,
    pub fragment_threshold_secs: i64,
    pub match_tolerance_secs: i64,
    /// Sort, clip and merge provider busy periods instead of rejecting them.
    pub normalize_busy: bool,
    pub lookup_failure: LookupFailurePolicy,
    /// Upper bound on a single provider call, if any.
    pub source_timeout_secs: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            day_start: NaiveTime::from_hms_opt(9, 30, 0).unwrap_or_default(),
            day_end: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default(),
            timezone: "UTC".to_string(),
            fragment_threshold_secs: FRAGMENT_THRESHOLD_SECS,
            match_tolerance_secs: MATCH_TOLERANCE_SECS,
            normalize_busy: false,
            lookup_failure: LookupFailurePolicy::default(),
            source_timeout_secs: None,
        }
    }
}

impl AnalysisConfig {
    /// Parse the configured zone.
    ///
    /// # Errors
    /// Returns `FocusError::InvalidTimezone` for names chrono-tz does not know.
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| FocusError::InvalidTimezone(self.timezone.clone()))
    }

    pub fn source_timeout(&self) -> Option<Duration> {
        self.source_timeout_secs.map(Duration::from_secs)
    }

    /// Check the parameters before any day is analyzed.
    pub fn validate(&self) -> Result<()> {
        if self.day_start >= self.day_end {
            return Err(FocusError::InvalidConfig(format!(
                "day_start {} must be before day_end {}",
                self.day_start, self.day_end
            )));
        }
        if !(1..=MAX_SETTING_SECS).contains(&self.fragment_threshold_secs) {
            return Err(FocusError::InvalidConfig(format!(
                "fragment threshold must be between 1s and {}s, got {}s",
                MAX_SETTING_SECS, self.fragment_threshold_secs
            )));
        }
        if !(0..=MAX_SETTING_SECS).contains(&self.match_tolerance_secs) {
            return Err(FocusError::InvalidConfig(format!(
                "match tolerance must be between 0s and {}s, got {}s",
                MAX_SETTING_SECS, self.match_tolerance_secs
            )));
        }
        if self.source_timeout_secs == Some(0) {
            return Err(FocusError::InvalidConfig(
                "source timeout must be at least one second".to_string(),
            ));
        }
        self.tz()?;
        Ok(())
    }
}
