//! Compute free time slots from event lists.
//!
//! Sorts events by start time and sweeps a cursor across the window once,
//! emitting every gap the cursor has to jump over.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::Event;

/// A free time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl FreeSlot {
    fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            duration_minutes: (end - start).num_minutes(),
        }
    }
}

/// Find free time slots within `[window_start, window_end)`, given the busy events.
///
/// Events may overlap or nest; the cursor only ever moves forward, so time an
/// earlier event already consumed is never reported twice. Returns maximal slots
/// sorted by start, none of which touch or overlap. An empty or inverted window
/// has no free time.
pub fn find_free_slots(
    events: &[Event],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<FreeSlot> {
    if window_start >= window_end {
        return Vec::new();
    }

    let mut busy: Vec<&Event> = events.iter().collect();
    busy.sort_by_key(|e| (e.start, e.end));

    let mut free_slots = Vec::new();
    let mut cursor = window_start;

    for event in busy {
        let gap_end = event.start.min(window_end);
        if cursor < gap_end {
            free_slots.push(FreeSlot::new(cursor, gap_end));
        }
        cursor = cursor.max(event.end);
    }

    // Trailing free slot after the last busy period.
    if cursor < window_end {
        free_slots.push(FreeSlot::new(cursor, window_end));
    }

    free_slots
}

/// Find the first free slot of at least `min_duration_minutes` within the window.
pub fn find_first_free_slot(
    events: &[Event],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    min_duration_minutes: i64,
) -> Option<FreeSlot> {
    find_free_slots(events, window_start, window_end)
        .into_iter()
        .find(|slot| slot.duration_minutes >= min_duration_minutes)
}
