//! The scheduling service: range fetch, conflict-checked booking, safe
//! update/remove and free-time computation on top of an [`EventStore`].
//!
//! # Invariants
//! - Range results are always re-filtered with [`Event::overlaps_window`]; the store's
//!   own filtering is advisory.
//! - `schedule` performs no store write when the requested range is busy.
//! - Store failures are returned as [`ScheduleError`] kinds, never raw.
//!
//! Mutating calls take `&mut self`, so the check-then-insert in
//! [`Scheduler::schedule`] cannot interleave with another write through the same
//! scheduler. Share one across threads behind a `Mutex`.

use chrono::{DateTime, Duration, Utc};
use log::{debug, error, info, warn};

use crate::alarm::{AlarmPolicy, AlarmSink};
use crate::conflict::{self, Conflict};
use crate::error::{Result, ScheduleError, UpdateFailure};
use crate::event::{Event, EventId};
use crate::freebusy::{self, FreeSlot};
use crate::ids::{IdGenerator, UuidIds};
use crate::store::EventStore;
use crate::task::{NewTask, Task};

/// Stateless scheduling logic bound to one calendar store.
pub struct Scheduler<S, G = UuidIds> {
    store: S,
    ids: G,
    alarms: Option<AlarmPolicy>,
}

impl<S: EventStore> Scheduler<S> {
    /// Scheduler assigning random UUIDs to new events.
    pub fn new(store: S) -> Self {
        Self::with_ids(store, UuidIds)
    }
}

impl<S: EventStore, G: IdGenerator> Scheduler<S, G> {
    pub fn with_ids(store: S, ids: G) -> Self {
        Self {
            store,
            ids,
            alarms: None,
        }
    }

    /// Attach an alarm `lead` before the start of every event this scheduler
    /// creates or moves.
    pub fn with_alarms(mut self, sink: impl AlarmSink + Send + 'static, lead: Duration) -> Self {
        self.alarms = Some(AlarmPolicy {
            sink: Box::new(sink),
            lead,
        });
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Tasks whose events overlap `[window_start, window_end)`.
    ///
    /// An event whose only contact with the window is an exact boundary touch is
    /// excluded. No particular order is guaranteed.
    pub fn fetch(&self, window_start: DateTime<Utc>, window_end: DateTime<Utc>) -> Vec<Task> {
        self.fetch_events(window_start, window_end)
            .into_iter()
            .map(Task::from)
            .collect()
    }

    /// Point lookup of a single task.
    pub fn task(&self, id: &EventId) -> Option<Task> {
        self.store.event_by_id(id).map(Task::from)
    }

    /// Delete the event `id`.
    ///
    /// # Errors
    /// - [`ScheduleError::NotFound`] when no event carries `id`.
    /// - [`ScheduleError::RemovalFailed`] when the store rejects the delete; the
    ///   record is left untouched.
    pub fn remove(&mut self, id: &EventId) -> Result<()> {
        let Some(event) = self.store.event_by_id(id) else {
            warn!("event=task_remove module=service status=not_found id={}", id);
            return Err(ScheduleError::NotFound(id.clone()));
        };

        self.store.delete(&event).map_err(|source| {
            warn!(
                "event=task_remove module=service status=error id={} error={}",
                id, source
            );
            ScheduleError::RemovalFailed {
                id: id.clone(),
                source,
            }
        })?;

        info!("event=task_remove module=service status=ok id={}", id);
        Ok(())
    }

    /// Move an existing task to `task.start..task.end` by removing its record and
    /// inserting a replacement under the same identifier.
    ///
    /// Only the time range reaches the store; `title` and `sort` are returned as
    /// given. The new range is not conflict-checked.
    ///
    /// # Errors
    /// - [`ScheduleError::InvalidInterval`] when `task.end <= task.start`.
    /// - [`ScheduleError::UpdateFailed`] when the record is missing or either
    ///   store write fails. [`UpdateFailure::Reinsert`] means the old record was
    ///   already removed and the store no longer holds the event.
    pub fn update(&mut self, task: &Task) -> Result<Task> {
        if task.end <= task.start {
            return Err(ScheduleError::InvalidInterval);
        }

        let fail = |reason: UpdateFailure| ScheduleError::UpdateFailed {
            id: task.id.clone(),
            reason,
        };

        let Some(existing) = self.store.event_by_id(&task.id) else {
            warn!("event=task_update module=service status=not_found id={}", task.id);
            return Err(fail(UpdateFailure::Missing));
        };

        if let Err(source) = self.store.delete(&existing) {
            warn!(
                "event=task_update module=service status=error stage=remove id={} error={}",
                task.id, source
            );
            return Err(fail(UpdateFailure::Remove(source)));
        }

        if let Err(source) = self.store.insert(task.to_event()) {
            error!(
                "event=task_update module=service status=degraded stage=insert id={} old_start={} old_end={} error={}",
                task.id,
                existing.start.to_rfc3339(),
                existing.end.to_rfc3339(),
                source
            );
            return Err(fail(UpdateFailure::Reinsert(source)));
        }

        info!(
            "event=task_update module=service status=ok id={} start={} end={}",
            task.id,
            task.start.to_rfc3339(),
            task.end.to_rfc3339()
        );
        self.attach_alarm(&task.id, task.start);
        Ok(task.clone())
    }

    /// Book `request` if its range is free, assigning a fresh identifier.
    ///
    /// # Errors
    /// - [`ScheduleError::InvalidInterval`] when `end <= start`.
    /// - [`ScheduleError::Conflict`] when any event overlaps the range. Nothing is
    ///   written.
    /// - [`ScheduleError::ScheduleFailed`] when the store rejects the insert.
    pub fn schedule(&mut self, request: NewTask) -> Result<Task> {
        if request.end <= request.start {
            return Err(ScheduleError::InvalidInterval);
        }

        let busy = self.fetch_events(request.start, request.end);
        if !busy.is_empty() {
            let conflicting: Vec<EventId> = busy.into_iter().map(|e| e.id).collect();
            warn!(
                "event=task_schedule module=service status=conflict start={} end={} conflicts={}",
                request.start.to_rfc3339(),
                request.end.to_rfc3339(),
                conflicting.len()
            );
            return Err(ScheduleError::Conflict { conflicting });
        }

        let task = request.into_task(self.ids.next_id());
        self.store.insert(task.to_event()).map_err(|source| {
            warn!(
                "event=task_schedule module=service status=error id={} error={}",
                task.id, source
            );
            ScheduleError::ScheduleFailed {
                id: task.id.clone(),
                source,
            }
        })?;

        info!(
            "event=task_schedule module=service status=ok id={} start={} end={}",
            task.id,
            task.start.to_rfc3339(),
            task.end.to_rfc3339()
        );
        self.attach_alarm(&task.id, task.start);
        Ok(task)
    }

    /// Gaps in `[window_start, window_end)` not covered by any fetched event,
    /// ascending by start.
    pub fn free_time_between(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Vec<FreeSlot> {
        let events = self.fetch_events(window_start, window_end);
        freebusy::find_free_slots(&events, window_start, window_end)
    }

    /// First gap in the window lasting at least `min_duration_minutes`.
    pub fn first_free_slot(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        min_duration_minutes: i64,
    ) -> Option<FreeSlot> {
        let events = self.fetch_events(window_start, window_end);
        freebusy::find_first_free_slot(&events, window_start, window_end, min_duration_minutes)
    }

    /// Pairs of events in the window that overlap each other.
    pub fn conflicts_between(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Vec<Conflict> {
        conflict::find_conflicts(&self.fetch_events(window_start, window_end))
    }

    fn fetch_events(&self, window_start: DateTime<Utc>, window_end: DateTime<Utc>) -> Vec<Event> {
        let candidates = self.store.events_between(window_start, window_end);
        let returned = candidates.len();
        let events: Vec<Event> = candidates
            .into_iter()
            .filter(|e| e.overlaps_window(window_start, window_end))
            .collect();
        debug!(
            "event=events_fetch module=service status=ok returned={} kept={}",
            returned,
            events.len()
        );
        events
    }

    fn attach_alarm(&mut self, id: &EventId, start: DateTime<Utc>) {
        let Some(policy) = self.alarms.as_mut() else {
            return;
        };
        if let Err(err) = policy.attach(id, start) {
            warn!(
                "event=alarm_attach module=service status=error id={} error={}",
                id, err
            );
        }
    }
}
