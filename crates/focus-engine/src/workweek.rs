//! Work window generation for the Monday–Friday week around a reference date.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::error::{FocusError, Result};
use crate::interval::TimeInterval;

/// Number of analyzed days per week (Monday through Friday).
pub const WORK_DAYS: i64 = 5;

/// One day's analysis boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkWindow {
    pub date: NaiveDate,
    pub interval: TimeInterval,
}

impl WorkWindow {
    pub fn start(&self) -> i64 {
        self.interval.start
    }

    pub fn end(&self) -> i64 {
        self.interval.end
    }
}

/// Build one work window per weekday of the week containing `reference`.
///
/// The configured clock times are read as local times in the configured zone,
/// so a window can be shorter or longer than usual on a DST transition day.
///
/// # Errors
/// Returns `FocusError::InvalidTimezone` if the configured zone is unknown, and
/// `FocusError::NonexistentLocalTime` if a clock time falls in a DST gap.
pub fn work_windows(config: &AnalysisConfig, reference: NaiveDate) -> Result<Vec<WorkWindow>> {
    let tz = config.tz()?;
    let monday = reference - Duration::days(i64::from(reference.weekday().num_days_from_monday()));

    (0..WORK_DAYS)
        .map(|offset| {
            let date = monday + Duration::days(offset);
            let start = local_epoch(&tz, date, config.day_start)?;
            let end = local_epoch(&tz, date, config.day_end)?;
            Ok(WorkWindow {
                date,
                interval: TimeInterval::new(start, end)?,
            })
        })
        .collect()
}

/// Work windows for the current week, as seen from the configured zone.
pub fn current_work_week(config: &AnalysisConfig) -> Result<Vec<WorkWindow>> {
    let tz = config.tz()?;
    let today = Utc::now().with_timezone(&tz).date_naive();
    work_windows(config, today)
}

fn local_epoch(tz: &Tz, date: NaiveDate, time: NaiveTime) -> Result<i64> {
    let naive = date.and_time(time);
    // Ambiguous times (DST fall-back) resolve to the earlier instant.
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
        .ok_or_else(|| FocusError::NonexistentLocalTime(naive.to_string()))
}
