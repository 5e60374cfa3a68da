//! The event store contract consumed by the scheduler, plus an in-memory store.
//!
//! Real calendars (a native calendar service, a file, a remote API) live behind
//! [`EventStore`]. The scheduler never assumes atomicity across calls and treats
//! range queries as advisory: implementations may over-return.

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::event::{Event, EventId};

/// Durable owner of calendar events.
pub trait EventStore {
    /// Events that may fall in `[start, end)`. Over-returning is allowed.
    fn events_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Event>;

    /// Point lookup by identifier.
    fn event_by_id(&self, id: &EventId) -> Option<Event>;

    /// Persist a new event. Must reject an identifier that already exists.
    fn insert(&mut self, event: Event) -> Result<(), StoreError>;

    /// Remove a stored event.
    fn delete(&mut self, event: &Event) -> Result<(), StoreError>;

    /// Whether the backing calendar is currently reachable.
    fn is_connected(&self) -> bool;
}

impl<S: EventStore + ?Sized> EventStore for Box<S> {
    fn events_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Event> {
        (**self).events_between(start, end)
    }

    fn event_by_id(&self, id: &EventId) -> Option<Event> {
        (**self).event_by_id(id)
    }

    fn insert(&mut self, event: Event) -> Result<(), StoreError> {
        (**self).insert(event)
    }

    fn delete(&mut self, event: &Event) -> Result<(), StoreError> {
        (**self).delete(event)
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }
}

/// Vec-backed store with a connectivity switch.
///
/// Range queries use an inclusive test, so they return boundary-touching events
/// that the scheduler's strict filter then drops. Writes fail with
/// [`StoreError::Disconnected`] while the store is offline; reads keep working.
#[derive(Debug, Clone)]
pub struct InMemoryEventStore {
    events: Vec<Event>,
    connected: bool,
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::with_events(Vec::new())
    }

    /// Seed the store. Later duplicates of an identifier are dropped.
    pub fn with_events(events: impl IntoIterator<Item = Event>) -> Self {
        let mut store = Self {
            events: Vec::new(),
            connected: true,
        };
        for event in events {
            if store.position(&event.id).is_none() {
                store.events.push(event);
            }
        }
        store
    }

    /// Simulate losing or regaining the backend connection.
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    /// Every stored event, in insertion order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn position(&self, id: &EventId) -> Option<usize> {
        self.events.iter().position(|e| &e.id == id)
    }
}

impl EventStore for InMemoryEventStore {
    fn events_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| e.start <= end && e.end >= start)
            .cloned()
            .collect()
    }

    fn event_by_id(&self, id: &EventId) -> Option<Event> {
        self.position(id).map(|idx| self.events[idx].clone())
    }

    fn insert(&mut self, event: Event) -> Result<(), StoreError> {
        if !self.connected {
            return Err(StoreError::Disconnected);
        }
        if self.position(&event.id).is_some() {
            return Err(StoreError::DuplicateId(event.id));
        }
        self.events.push(event);
        Ok(())
    }

    fn delete(&mut self, event: &Event) -> Result<(), StoreError> {
        if !self.connected {
            return Err(StoreError::Disconnected);
        }
        let idx = self
            .position(&event.id)
            .ok_or_else(|| StoreError::Missing(event.id.clone()))?;
        self.events.remove(idx);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
