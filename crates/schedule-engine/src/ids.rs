//! Identifier assignment strategies for newly scheduled events.

use uuid::Uuid;

use crate::event::EventId;

/// Produces a fresh identifier for each event the scheduler creates.
pub trait IdGenerator {
    fn next_id(&mut self) -> EventId;
}

impl<G: IdGenerator + ?Sized> IdGenerator for Box<G> {
    fn next_id(&mut self) -> EventId {
        (**self).next_id()
    }
}

/// Random v4 UUIDs, upper-case hyphenated.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> EventId {
        EventId::new(Uuid::new_v4().hyphenated().to_string().to_uppercase())
    }
}

/// `<prefix>-<n>` identifiers from a counter.
///
/// Deterministic, so useful for tests and for stores that expect readable ids.
/// The counter is not persisted: a fresh generator over a populated store may
/// hand out an id that already exists, which the store rejects on insert.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::starting_at(prefix, 1)
    }

    pub fn starting_at(prefix: impl Into<String>, next: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> EventId {
        let id = EventId::new(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}
