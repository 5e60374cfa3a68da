//! Service-facing view of calendar events.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{Event, EventId};

/// Where a task has been sorted to by its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortStatus {
    #[default]
    Unsorted,
    Morning,
    Afternoon,
    Evening,
    /// Deferred by one day.
    Skip1,
    /// Deferred by three days.
    Skip3,
    /// Deferred by a week.
    Skip7,
}

impl SortStatus {
    pub const ALL: [SortStatus; 7] = [
        SortStatus::Unsorted,
        SortStatus::Morning,
        SortStatus::Afternoon,
        SortStatus::Evening,
        SortStatus::Skip1,
        SortStatus::Skip3,
        SortStatus::Skip7,
    ];

    /// How far the task is pushed back, for the deferral classifications.
    pub fn deferral(self) -> Option<Duration> {
        match self {
            SortStatus::Skip1 => Some(Duration::days(1)),
            SortStatus::Skip3 => Some(Duration::days(3)),
            SortStatus::Skip7 => Some(Duration::days(7)),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            SortStatus::Unsorted => "unsorted",
            SortStatus::Morning => "morning",
            SortStatus::Afternoon => "afternoon",
            SortStatus::Evening => "evening",
            SortStatus::Skip1 => "skip1",
            SortStatus::Skip3 => "skip3",
            SortStatus::Skip7 => "skip7",
        }
    }
}

impl fmt::Display for SortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown sort status '{}'; expected one of: unsorted, morning, afternoon, evening, skip1, skip3, skip7",
                    s
                )
            })
    }
}

/// A scheduled item as seen by callers of the scheduler.
///
/// `id`, `start` and `end` mirror the backing [`Event`]; `title` and `sort` live
/// only on this side and are not required to exist on the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: EventId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub sort: SortStatus,
}

impl Task {
    /// Copy of this task moved to a new time range.
    pub fn rescheduled(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            ..self.clone()
        }
    }

    /// The record the store should hold for this task.
    pub fn to_event(&self) -> Event {
        Event::new(self.id.clone(), self.start, self.end)
    }
}

impl From<Event> for Task {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            title: None,
            start: event.start,
            end: event.end,
            sort: SortStatus::Unsorted,
        }
    }
}

/// A booking request. The scheduler assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub sort: SortStatus,
}

impl NewTask {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            title: None,
            start,
            end,
            sort: SortStatus::Unsorted,
        }
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn sorted(mut self, sort: SortStatus) -> Self {
        self.sort = sort;
        self
    }

    pub(crate) fn into_task(self, id: EventId) -> Task {
        Task {
            id,
            title: self.title,
            start: self.start,
            end: self.end,
            sort: self.sort,
        }
    }
}
