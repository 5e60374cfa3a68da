//! Error types for schedule-engine operations.

use thiserror::Error;

use crate::event::EventId;

/// Failures reported by an [`EventStore`](crate::store::EventStore) implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing calendar could not be reached.
    #[error("event store is not connected")]
    Disconnected,

    /// An event with this identifier already exists.
    #[error("event {0} already exists")]
    DuplicateId(EventId),

    /// The event to delete is not held by the store.
    #[error("event {0} is not in the store")]
    Missing(EventId),

    /// Backend-specific failure (I/O, serialization, ...).
    #[error("backend error: {0}")]
    Backend(String),
}

/// Why an [`update`](crate::service::Scheduler::update) did not go through.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdateFailure {
    /// No record carries the task's identifier.
    #[error("no record to update")]
    Missing,

    /// The old record could not be removed; the store is unchanged.
    #[error("removing the old record failed: {0}")]
    Remove(StoreError),

    /// The old record was removed but the new one could not be inserted.
    /// The store no longer holds the event.
    #[error("reinserting the record failed, event was dropped: {0}")]
    Reinsert(StoreError),
}

/// Errors surfaced by the [`Scheduler`](crate::service::Scheduler).
///
/// Store-level failures never escape untranslated; they are carried as the
/// source of one of these kinds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("event {0} not found")]
    NotFound(EventId),

    #[error("could not remove event {id}")]
    RemovalFailed {
        id: EventId,
        #[source]
        source: StoreError,
    },

    /// Covers both a missing record and a failed remove/insert pair.
    #[error("could not update event {id}")]
    UpdateFailed {
        id: EventId,
        #[source]
        reason: UpdateFailure,
    },

    #[error("could not save event {id}")]
    ScheduleFailed {
        id: EventId,
        #[source]
        source: StoreError,
    },

    /// The requested interval overlaps existing events. Nothing was written.
    #[error("schedule is busy: overlaps {} existing event(s)", .conflicting.len())]
    Conflict { conflicting: Vec<EventId> },

    /// `end` is not strictly after `start`.
    #[error("invalid interval: end must be after start")]
    InvalidInterval,
}

impl ScheduleError {
    /// `true` for logical rejections that a retry would not fix.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ScheduleError::Conflict { .. }
                | ScheduleError::InvalidInterval
                | ScheduleError::NotFound(_)
                | ScheduleError::UpdateFailed {
                    reason: UpdateFailure::Missing,
                    ..
                }
        )
    }
}

/// Convenience alias used throughout schedule-engine.
pub type Result<T> = std::result::Result<T, ScheduleError>;
