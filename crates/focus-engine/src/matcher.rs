//! Find the meetings bordering fragmented free time.
//!
//! A short gap is usually squeezed between two meetings. For every fragment the
//! matcher asks the event source for an event ending right where the gap starts
//! and for one starting right where it ends, within a tolerance. Boundaries that
//! coincide with the work window's own edges are not looked up.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{FocusError, Result};
use crate::interval::TimeInterval;
use crate::source::{EventQuery, EventSource};

/// What to do when an event lookup fails (as opposed to finding nothing).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupFailurePolicy {
    /// Propagate the first failure; the day's analysis fails.
    #[default]
    Abort,
    /// Keep going and record each failed lookup alongside the matches.
    Record,
}

/// A boundary lookup that failed under [`LookupFailurePolicy::Record`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupFailure {
    pub query: EventQuery,
    pub error: String,
}

/// Events bordering a day's fragments, deduplicated, in lookup order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    pub event_ids: Vec<String>,
    pub failures: Vec<LookupFailure>,
}

/// The lookups the matcher performs for `fragmented`, in call order.
///
/// Per fragment: the start-boundary query (events ending near the gap start)
/// unless the gap starts the window, then the end-boundary query (events
/// starting near the gap end) unless the gap ends the window.
pub fn boundary_queries(
    window: &TimeInterval,
    fragmented: &[TimeInterval],
    tolerance_secs: i64,
) -> Vec<EventQuery> {
    let mut queries = Vec::with_capacity(fragmented.len() * 2);
    for gap in fragmented {
        if gap.start != window.start {
            queries.push(EventQuery::ending_near(gap.start, tolerance_secs));
        }
        if gap.end != window.end {
            queries.push(EventQuery::starting_near(gap.end, tolerance_secs));
        }
    }
    queries
}

/// Look up the events bordering each fragmented gap.
///
/// "No event found" adds nothing. An event bordering several fragments is
/// reported once.
///
/// # Errors
/// Under [`LookupFailurePolicy::Abort`], the first source failure is returned
/// as `FocusError::Source`. Under [`LookupFailurePolicy::Record`] this never fails.
pub fn find_unoptimized_events<E: EventSource + ?Sized>(
    source: &E,
    calendar_id: &str,
    window: &TimeInterval,
    fragmented: &[TimeInterval],
    tolerance_secs: i64,
    policy: LookupFailurePolicy,
) -> Result<MatchOutcome> {
    let mut outcome = MatchOutcome::default();
    let mut seen: HashSet<String> = HashSet::new();

    for query in boundary_queries(window, fragmented, tolerance_secs) {
        match source.find_event(calendar_id, &query) {
            Ok(Some(event)) => {
                if seen.insert(event.id.clone()) {
                    debug!(event_id = %event.id, ?query, "bordering event found");
                    outcome.event_ids.push(event.id);
                }
            }
            Ok(None) => debug!(?query, "no bordering event"),
            Err(err) => match policy {
                LookupFailurePolicy::Abort => {
                    return Err(FocusError::Source {
                        operation: "event lookup",
                        source: err,
                    });
                }
                LookupFailurePolicy::Record => {
                    warn!(?query, error = %err, "event lookup failed, continuing");
                    outcome.failures.push(LookupFailure {
                        query,
                        error: err.to_string(),
                    });
                }
            },
        }
    }

    Ok(outcome)
}
