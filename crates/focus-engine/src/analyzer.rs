//! The per-day fragmentation pipeline.
//!
//! For each work window: fetch busy periods, optionally normalize them, extract
//! free gaps, classify them, look up the meetings bordering fragments, and
//! assemble a [`DayReport`]. Days share nothing but the read-only configuration
//! and the sources, so a failed day never affects the others.

use std::thread;

use chrono::NaiveDate;
use chrono_tz::Tz;
use tracing::{debug, info, instrument, warn};

use crate::classify::classify_gaps;
use crate::config::AnalysisConfig;
use crate::error::{FocusError, Result};
use crate::gaps::{extract_free_intervals, normalize_busy_periods};
use crate::matcher::find_unoptimized_events;
use crate::report::{assemble_day_report, DayFailure, DayReport, WeekReport};
use crate::source::{BusyPeriodSource, EventSource};
use crate::workweek::WorkWindow;

/// Runs the pipeline against an account's busy periods and a calendar's events.
#[derive(Debug)]
pub struct Analyzer<B, E> {
    config: AnalysisConfig,
    tz: Tz,
    busy_source: B,
    event_source: E,
    account: String,
    calendar_id: String,
}

impl<B, E> Analyzer<B, E>
where
    B: BusyPeriodSource,
    E: EventSource,
{
    /// # Errors
    /// Returns `FocusError::InvalidConfig` or `FocusError::InvalidTimezone` if
    /// `config` does not validate.
    pub fn new(
        config: AnalysisConfig,
        busy_source: B,
        event_source: E,
        account: impl Into<String>,
        calendar_id: impl Into<String>,
    ) -> Result<Self> {
        config.validate()?;
        let tz = config.tz()?;
        Ok(Self {
            config,
            tz,
            busy_source,
            event_source,
            account: account.into(),
            calendar_id: calendar_id.into(),
        })
    }

    /// Analyze a single work day.
    ///
    /// # Errors
    /// Fails with `FocusError::Source` if the busy-period fetch fails (or an
    /// event lookup fails under the abort policy), and with an input-invariant
    /// error if the busy periods are unsorted, overlapping or outside the
    /// window and normalization is off.
    #[instrument(skip_all, fields(date = %window.date))]
    pub fn analyze_day(&self, window: &WorkWindow) -> Result<DayReport> {
        let fetched = self
            .busy_source
            .busy_periods(&self.account, &window.interval)
            .map_err(|source| FocusError::Source {
                operation: "busy period fetch",
                source,
            })?;

        let busy = if self.config.normalize_busy {
            normalize_busy_periods(&window.interval, &fetched)
        } else {
            fetched
        };

        let free = extract_free_intervals(&window.interval, &busy)?;
        let gaps = classify_gaps(&free, self.config.fragment_threshold_secs);
        debug!(
            busy = busy.len(),
            free = free.len(),
            fragmented = gaps.fragmented.len(),
            "free gaps classified"
        );

        let matches = find_unoptimized_events(
            &self.event_source,
            &self.calendar_id,
            &window.interval,
            &gaps.fragmented,
            self.config.match_tolerance_secs,
            self.config.lookup_failure,
        )?;

        let report = assemble_day_report(window, &gaps, matches, &self.tz);
        info!(
            uninterrupted_minutes = report.uninterrupted.minutes,
            fragmented_minutes = report.fragmented.minutes,
            unoptimized = report.unoptimized_meetings.len(),
            "day analyzed"
        );
        Ok(report)
    }

    /// Analyze each window in order, one after another.
    pub fn analyze_week(&self, windows: &[WorkWindow]) -> WeekReport {
        collect_week(
            windows
                .iter()
                .map(|window| (window.date, self.analyze_day(window))),
        )
    }
}

impl<B, E> Analyzer<B, E>
where
    B: BusyPeriodSource + Sync,
    E: EventSource + Sync,
{
    /// Analyze all windows concurrently, one scoped thread per day.
    ///
    /// Produces the same report as [`Analyzer::analyze_week`]; days stay in
    /// window order.
    pub fn analyze_week_parallel(&self, windows: &[WorkWindow]) -> WeekReport {
        let results: Vec<(NaiveDate, Result<DayReport>)> = thread::scope(|scope| {
            let handles: Vec<_> = windows
                .iter()
                .map(|window| (window.date, scope.spawn(move || self.analyze_day(window))))
                .collect();

            handles
                .into_iter()
                .map(|(date, handle)| {
                    let result = handle
                        .join()
                        .unwrap_or_else(|payload| std::panic::resume_unwind(payload));
                    (date, result)
                })
                .collect()
        });

        collect_week(results)
    }
}

fn collect_week(results: impl IntoIterator<Item = (NaiveDate, Result<DayReport>)>) -> WeekReport {
    let mut week = WeekReport::default();
    for (date, result) in results {
        match result {
            Ok(report) => week.days.push(report),
            Err(err) => {
                warn!(%date, error = %err, "day analysis failed");
                week.failures.push(DayFailure {
                    date,
                    error: err.to_string(),
                });
            }
        }
    }
    week
}
