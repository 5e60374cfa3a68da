//! Detect events that overlap one another.
//!
//! Used to audit a calendar that external collaborators may have written to
//! without going through the scheduler's conflict check.
//! Adjacent events (where one ends exactly when another starts) are NOT conflicts.

use serde::{Deserialize, Serialize};

use crate::event::Event;

/// A detected overlap between two stored events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub event_a: Event,
    pub event_b: Event,
    pub overlap_minutes: i64,
}

/// Find every pair of events in `events` whose time ranges overlap.
///
/// Two events overlap when `a.start < b.end && b.start < a.end`; the overlap
/// duration is `min(a.end, b.end) - max(a.start, b.start)`. Pairs are reported
/// once, ordered by the earlier event's start.
pub fn find_conflicts(events: &[Event]) -> Vec<Conflict> {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by_key(|e| (e.start, e.end));

    let mut conflicts = Vec::new();

    for (i, a) in sorted.iter().enumerate() {
        // Later events start no earlier than `a`, so stop at the first one that
        // begins at or after `a` ends.
        for b in sorted[i + 1..].iter().take_while(|b| b.start < a.end) {
            if a.start < b.end {
                let overlap_start = a.start.max(b.start);
                let overlap_end = a.end.min(b.end);
                conflicts.push(Conflict {
                    event_a: (*a).clone(),
                    event_b: (*b).clone(),
                    overlap_minutes: (overlap_end - overlap_start).num_minutes(),
                });
            }
        }
    }

    conflicts
}
