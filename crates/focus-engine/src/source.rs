//! Calendar provider seams.
//!
//! The engine never talks to a provider directly. Callers hand it a
//! [`BusyPeriodSource`] and an [`EventSource`]; [`StaticCalendar`] serves both
//! from an in-memory (JSON-loadable) snapshot, and [`TimedSource`] bounds every
//! call of another source with a timeout.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SourceError};
use crate::gaps::normalize_busy_periods;
use crate::interval::TimeInterval;

/// Result of a single provider call.
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// A calendar event as far as the engine cares: an opaque id and its span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub start: i64,
    pub end: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Time filter for an event lookup. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventQuery {
    EndsBetween { after: i64, before: i64 },
    StartsBetween { after: i64, before: i64 },
}

impl EventQuery {
    /// Events ending within `tolerance` seconds of `instant`.
    pub fn ending_near(instant: i64, tolerance: i64) -> Self {
        EventQuery::EndsBetween {
            after: instant.saturating_sub(tolerance),
            before: instant.saturating_add(tolerance),
        }
    }

    /// Events starting within `tolerance` seconds of `instant`.
    pub fn starting_near(instant: i64, tolerance: i64) -> Self {
        EventQuery::StartsBetween {
            after: instant.saturating_sub(tolerance),
            before: instant.saturating_add(tolerance),
        }
    }

    pub fn matches(&self, event: &CalendarEvent) -> bool {
        match *self {
            EventQuery::EndsBetween { after, before } => (after..=before).contains(&event.end),
            EventQuery::StartsBetween { after, before } => {
                (after..=before).contains(&event.start)
            }
        }
    }
}

/// Provider of an account's busy periods.
pub trait BusyPeriodSource {
    /// Busy periods overlapping `window`, sorted by start.
    fn busy_periods(&self, account: &str, window: &TimeInterval) -> SourceResult<Vec<TimeInterval>>;
}

/// Provider of calendar events.
pub trait EventSource {
    /// The first event matching `query`, or `Ok(None)` when there is none.
    fn find_event(&self, calendar_id: &str, query: &EventQuery)
        -> SourceResult<Option<CalendarEvent>>;
}

impl<T: BusyPeriodSource + ?Sized> BusyPeriodSource for &T {
    fn busy_periods(&self, account: &str, window: &TimeInterval) -> SourceResult<Vec<TimeInterval>> {
        (**self).busy_periods(account, window)
    }
}

impl<T: EventSource + ?Sized> EventSource for &T {
    fn find_event(
        &self,
        calendar_id: &str,
        query: &EventQuery,
    ) -> SourceResult<Option<CalendarEvent>> {
        (**self).find_event(calendar_id, query)
    }
}

impl<T: BusyPeriodSource + ?Sized> BusyPeriodSource for Arc<T> {
    fn busy_periods(&self, account: &str, window: &TimeInterval) -> SourceResult<Vec<TimeInterval>> {
        (**self).busy_periods(account, window)
    }
}

impl<T: EventSource + ?Sized> EventSource for Arc<T> {
    fn find_event(
        &self,
        calendar_id: &str,
        query: &EventQuery,
    ) -> SourceResult<Option<CalendarEvent>> {
        (**self).find_event(calendar_id, query)
    }
}

// ── In-memory snapshot ──────────────────────────────────────────────────────

/// A single account's calendar held in memory.
///
/// Serves busy periods the way a free/busy endpoint does (every stored period
/// overlapping the requested range, unclipped) and event lookups the way an
/// events endpoint does (earliest-starting match first).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticCalendar {
    #[serde(default)]
    pub busy: Vec<TimeInterval>,
    #[serde(default)]
    pub events: Vec<CalendarEvent>,
}

impl StaticCalendar {
    pub fn new(busy: Vec<TimeInterval>, events: Vec<CalendarEvent>) -> Self {
        Self { busy, events }
    }

    /// Parse a snapshot document: `{"busy": [...], "events": [...]}`.
    ///
    /// When the document has no `busy` key, busy periods are derived from the
    /// event spans. An explicit `"busy": []` is kept as a free calendar.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: SnapshotDocument = serde_json::from_str(json)?;
        match document.busy {
            Some(busy) => Ok(Self::new(busy, document.events)),
            None => Ok(Self::new(Vec::new(), document.events).with_busy_from_events()),
        }
    }

    /// Replace the busy list with the merged spans of all events.
    pub fn with_busy_from_events(mut self) -> Self {
        let spans: Vec<TimeInterval> = self
            .events
            .iter()
            .map(|e| TimeInterval {
                start: e.start,
                end: e.end,
            })
            .collect();
        let (Some(first), Some(last)) = (
            spans.iter().map(|s| s.start).min(),
            spans.iter().map(|s| s.end).max(),
        ) else {
            self.busy.clear();
            return self;
        };
        self.busy = normalize_busy_periods(&TimeInterval { start: first, end: last }, &spans);
        self
    }
}

/// On-disk snapshot shape; `busy: None` means the key was absent.
#[derive(Deserialize)]
struct SnapshotDocument {
    #[serde(default)]
    busy: Option<Vec<TimeInterval>>,
    #[serde(default)]
    events: Vec<CalendarEvent>,
}

impl BusyPeriodSource for StaticCalendar {
    fn busy_periods(&self, _account: &str, window: &TimeInterval) -> SourceResult<Vec<TimeInterval>> {
        let mut periods: Vec<TimeInterval> = self
            .busy
            .iter()
            .filter(|b| b.overlaps(window))
            .copied()
            .collect();
        periods.sort();
        Ok(periods)
    }
}

impl EventSource for StaticCalendar {
    fn find_event(
        &self,
        _calendar_id: &str,
        query: &EventQuery,
    ) -> SourceResult<Option<CalendarEvent>> {
        Ok(self
            .events
            .iter()
            .filter(|e| query.matches(e))
            .min_by(|a, b| (a.start, &a.id).cmp(&(b.start, &b.id)))
            .cloned())
    }
}

// ── Timeouts ────────────────────────────────────────────────────────────────

/// Wraps a source so that each call gives up after `timeout`.
///
/// The wrapped call runs on a helper thread; a call that times out is left to
/// finish in the background and its result is discarded.
#[derive(Debug)]
pub struct TimedSource<S> {
    inner: Arc<S>,
    timeout: Duration,
}

impl<S> TimedSource<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self::from_arc(Arc::new(inner), timeout)
    }

    pub fn from_arc(inner: Arc<S>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

impl<S> Clone for TimedSource<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            timeout: self.timeout,
        }
    }
}

fn call_with_timeout<S, T, F>(inner: &Arc<S>, timeout: Duration, call: F) -> SourceResult<T>
where
    S: Send + Sync + 'static,
    T: Send + 'static,
    F: FnOnce(&S) -> SourceResult<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let inner = Arc::clone(inner);
    thread::spawn(move || {
        // The receiver is gone if the caller already timed out.
        let _ = tx.send(call(&inner));
    });

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(SourceError::Timeout(timeout)),
        Err(RecvTimeoutError::Disconnected) => Err(SourceError::Unavailable(
            "source call terminated without a response".to_string(),
        )),
    }
}

impl<S> BusyPeriodSource for TimedSource<S>
where
    S: BusyPeriodSource + Send + Sync + 'static,
{
    fn busy_periods(&self, account: &str, window: &TimeInterval) -> SourceResult<Vec<TimeInterval>> {
        let account = account.to_string();
        let window = *window;
        call_with_timeout(&self.inner, self.timeout, move |source| {
            source.busy_periods(&account, &window)
        })
    }
}

impl<S> EventSource for TimedSource<S>
where
    S: EventSource + Send + Sync + 'static,
{
    fn find_event(
        &self,
        calendar_id: &str,
        query: &EventQuery,
    ) -> SourceResult<Option<CalendarEvent>> {
        let calendar_id = calendar_id.to_string();
        let query = *query;
        call_with_timeout(&self.inner, self.timeout, move |source| {
            source.find_event(&calendar_id, &query)
        })
    }
}
