//! Property-based tests for fetching, free time and booking using proptest.
//!
//! These tests verify invariants that should hold for *any* calendar and window,
//! not just the fixed scenarios in `scheduler_tests.rs`.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use schedule_engine::{
    Event, EventId, InMemoryEventStore, NewTask, ScheduleError, Scheduler, SequentialIds,
};

// ---------------------------------------------------------------------------
// Strategies: calendars and windows on a single day, minute resolution
// ---------------------------------------------------------------------------

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 6, 0, 0).unwrap()
}

/// (start offset, duration) in minutes; events may overlap each other.
fn arb_span() -> impl Strategy<Value = (i64, i64)> {
    (0i64..720, 1i64..=180)
}

fn arb_events() -> impl Strategy<Value = Vec<Event>> {
    prop::collection::vec(arb_span(), 0..12).prop_map(|spans| {
        spans
            .into_iter()
            .enumerate()
            .map(|(i, (offset, len))| {
                let start = base() + Duration::minutes(offset);
                Event::new(format!("evt-{}", i), start, start + Duration::minutes(len))
            })
            .collect()
    })
}

/// Window as (start, end) with at least one minute of length.
fn arb_window() -> impl Strategy<Value = (DateTime<Utc>, DateTime<Utc>)> {
    arb_span().prop_map(|(offset, len)| {
        let start = base() + Duration::minutes(offset);
        (start, start + Duration::minutes(len))
    })
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

fn scheduler_over(events: &[Event]) -> Scheduler<InMemoryEventStore, SequentialIds> {
    Scheduler::with_ids(
        InMemoryEventStore::with_events(events.iter().cloned()),
        SequentialIds::new("new"),
    )
}

// ---------------------------------------------------------------------------
// Property 1: fetch returns exactly the events satisfying the strict predicate
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn fetch_matches_strict_predicate(events in arb_events(), (ws, we) in arb_window()) {
        let scheduler = scheduler_over(&events);

        let mut fetched: Vec<EventId> = scheduler.fetch(ws, we).into_iter().map(|t| t.id).collect();
        fetched.sort();

        let mut expected: Vec<EventId> = events
            .iter()
            .filter(|e| (e.end > ws && e.end < we) || (e.start < we && e.start > ws))
            .map(|e| e.id.clone())
            .collect();
        expected.sort();

        prop_assert_eq!(fetched, expected);
    }
}

// ---------------------------------------------------------------------------
// Property 2: free slots are ordered, non-empty, disjoint and inside the window
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn free_slots_are_ordered_and_disjoint(events in arb_events(), (ws, we) in arb_window()) {
        let free = scheduler_over(&events).free_time_between(ws, we);

        for slot in &free {
            prop_assert!(slot.start < slot.end, "empty slot {:?}", slot);
            prop_assert!(slot.start >= ws && slot.end <= we, "slot {:?} outside window", slot);
        }
        for pair in free.windows(2) {
            prop_assert!(
                pair[0].end < pair[1].start,
                "slots touch or overlap: {:?} / {:?}",
                pair[0],
                pair[1]
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: free slots and fetched events partition the window
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn free_and_busy_partition_window(events in arb_events(), (ws, we) in arb_window()) {
        let scheduler = scheduler_over(&events);
        let busy = scheduler.fetch(ws, we);
        let free = scheduler.free_time_between(ws, we);

        // Sample the middle of every minute so no sample sits on a boundary.
        let minutes = (we - ws).num_minutes();
        for m in 0..minutes {
            let t = ws + Duration::minutes(m) + Duration::seconds(30);
            let is_free = free.iter().any(|s| s.start <= t && t < s.end);
            let is_busy = busy.iter().any(|b| b.start <= t && t < b.end);
            prop_assert!(is_free != is_busy, "instant {} free={} busy={}", t, is_free, is_busy);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: booking either conflicts without writing or lands exactly once
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn schedule_is_all_or_nothing(events in arb_events(), (start, end) in arb_window()) {
        let mut scheduler = scheduler_over(&events);
        let before = scheduler.store().events().to_vec();
        let busy = !scheduler.fetch(start, end).is_empty();

        match scheduler.schedule(NewTask::new(start, end)) {
            Err(ScheduleError::Conflict { conflicting }) => {
                prop_assert!(busy);
                prop_assert!(!conflicting.is_empty());
                prop_assert_eq!(scheduler.store().events(), before.as_slice());
            }
            Ok(task) => {
                prop_assert!(!busy);
                prop_assert_eq!(scheduler.store().len(), before.len() + 1);
                let probe_start = start - Duration::minutes(1);
                let probe_end = end + Duration::minutes(1);
                let hits = scheduler
                    .fetch(probe_start, probe_end)
                    .into_iter()
                    .filter(|t| t.id == task.id)
                    .count();
                prop_assert_eq!(hits, 1);
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}
