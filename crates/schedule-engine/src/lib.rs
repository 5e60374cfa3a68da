//! # schedule-engine
//!
//! Conflict-aware scheduling of time-bounded tasks against an externally owned
//! calendar.
//!
//! The engine answers three questions about a calendar: what is scheduled in a
//! window, whether a new item can be placed without collision, and which gaps
//! remain. Persistence belongs to whatever implements [`EventStore`]; the
//! [`Scheduler`] is stateless logic on top of it.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use schedule_engine::{InMemoryEventStore, NewTask, Scheduler};
//!
//! let at = |h, m| Utc.with_ymd_and_hms(2026, 3, 1, h, m, 0).unwrap();
//! let mut scheduler = Scheduler::new(InMemoryEventStore::new());
//!
//! scheduler.schedule(NewTask::new(at(8, 0), at(8, 30)).titled("Standup")).unwrap();
//!
//! let free = scheduler.free_time_between(at(7, 0), at(9, 0));
//! assert_eq!(free.len(), 2);
//! assert_eq!((free[0].start, free[0].end), (at(7, 0), at(8, 0)));
//! ```
//!
//! ## Modules
//!
//! - [`service`]: [`Scheduler`] with fetch, schedule, update, remove, free time
//! - [`store`]: the [`EventStore`] contract and an in-memory implementation
//! - [`event`]: backing records and the strict window overlap predicate
//! - [`task`]: service-facing tasks and sort classifications
//! - [`freebusy`]: free-slot sweep over an event list
//! - [`conflict`]: pairwise overlap audit
//! - [`ids`]: identifier assignment strategies
//! - [`alarm`]: optional alarm attachment collaborator
//! - [`error`]: Error types

pub mod alarm;
pub mod conflict;
pub mod error;
pub mod event;
pub mod freebusy;
pub mod ids;
pub mod service;
pub mod store;
pub mod task;

pub use alarm::{AlarmSink, RecordedAlarms};
pub use conflict::{find_conflicts, Conflict};
pub use error::{ScheduleError, StoreError, UpdateFailure};
pub use event::{Event, EventId};
pub use freebusy::{find_free_slots, FreeSlot};
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use service::Scheduler;
pub use store::{EventStore, InMemoryEventStore};
pub use task::{NewTask, SortStatus, Task};
