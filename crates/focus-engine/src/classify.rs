//! Split free gaps into uninterrupted blocks and fragments.

use serde::{Deserialize, Serialize};

use crate::interval::TimeInterval;

/// Which side of the fragmentation threshold a free gap falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapKind {
    /// At least the threshold long.
    Uninterrupted,
    /// Shorter than the threshold but not empty.
    Fragmented,
}

/// Classify a single gap, or `None` for a zero-length one.
pub fn classify_gap(gap: &TimeInterval, threshold_secs: i64) -> Option<GapKind> {
    let duration = gap.duration_seconds();
    if duration >= threshold_secs {
        Some(GapKind::Uninterrupted)
    } else if duration > 0 {
        Some(GapKind::Fragmented)
    } else {
        None
    }
}

/// Free gaps partitioned by [`classify_gaps`], each side in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedGaps {
    pub uninterrupted: Vec<TimeInterval>,
    pub fragmented: Vec<TimeInterval>,
}

/// Partition free gaps around `threshold_secs`.
///
/// Every non-empty gap lands in exactly one of the two sets.
pub fn classify_gaps(free: &[TimeInterval], threshold_secs: i64) -> ClassifiedGaps {
    let mut classified = ClassifiedGaps::default();

    for gap in free {
        match classify_gap(gap, threshold_secs) {
            Some(GapKind::Uninterrupted) => classified.uninterrupted.push(*gap),
            Some(GapKind::Fragmented) => classified.fragmented.push(*gap),
            None => {}
        }
    }

    classified
}
