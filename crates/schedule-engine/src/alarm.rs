//! Optional alarm attachment for scheduled events.
//!
//! Alarms are owned by a separate collaborator (a reminder service, the native
//! calendar's alarm API, ...). The scheduler only tells it when to fire.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};

use crate::error::StoreError;
use crate::event::EventId;

/// Receives alarm requests for events the scheduler has written.
pub trait AlarmSink {
    /// Attach an alarm firing at `fire_at` to the event `id`.
    fn attach(&mut self, id: &EventId, fire_at: DateTime<Utc>) -> Result<(), StoreError>;
}

/// An [`AlarmSink`] together with how long before the event start it fires.
pub(crate) struct AlarmPolicy {
    pub(crate) sink: Box<dyn AlarmSink + Send>,
    pub(crate) lead: Duration,
}

impl AlarmPolicy {
    pub(crate) fn attach(&mut self, id: &EventId, start: DateTime<Utc>) -> Result<(), StoreError> {
        self.sink.attach(id, start - self.lead)
    }
}

/// Keeps every requested alarm in memory.
///
/// Clones share the same log, so a caller can keep one handle and hand the
/// other to the scheduler.
#[derive(Debug, Clone, Default)]
pub struct RecordedAlarms {
    alarms: Arc<Mutex<Vec<(EventId, DateTime<Utc>)>>>,
}

impl RecordedAlarms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alarms attached so far, in request order.
    pub fn snapshot(&self) -> Vec<(EventId, DateTime<Utc>)> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(EventId, DateTime<Utc>)>> {
        self.alarms.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AlarmSink for RecordedAlarms {
    fn attach(&mut self, id: &EventId, fire_at: DateTime<Utc>) -> Result<(), StoreError> {
        self.lock().push((id.clone(), fire_at));
        Ok(())
    }
}
