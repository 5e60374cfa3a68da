//! JSON calendar file backing the `schedule` CLI.
//!
//! The file holds a JSON array of `{"id", "start", "end"}` objects with RFC 3339
//! instants. It is read once on open and rewritten in full after every write; a
//! failed rewrite rolls the in-memory change back so the file stays the source of
//! truth.
//!
//! An open store holds an exclusive advisory lock on `<calendar>.lock` until it
//! is dropped, so a second process opening the same calendar waits and then reads
//! the first one's writes. Rewrites go to a sibling temp file that is renamed over
//! the calendar.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fs4::fs_std::FileExt;
use log::debug;
use schedule_engine::{Event, EventId, EventStore, StoreError};
use tempfile::NamedTempFile;

pub struct JsonFileStore {
    path: PathBuf,
    events: Vec<Event>,
    /// Released when the store is dropped. `None` while the directory is missing.
    _lock: Option<File>,
}

impl JsonFileStore {
    /// Lock and load the calendar at `path`. A missing file is an empty calendar.
    ///
    /// Blocks while another store holds the calendar open.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let lock = acquire_lock(&path)?;
        let events: Vec<Event> = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read calendar: {}", path.display()))?;
            if raw.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&raw)
                    .with_context(|| format!("Invalid calendar JSON: {}", path.display()))?
            }
        } else {
            Vec::new()
        };

        if let Some(dup) = first_duplicate(&events) {
            anyhow::bail!(
                "Calendar {} holds event id '{}' more than once",
                path.display(),
                dup
            );
        }

        debug!(
            "event=calendar_open module=file_store status=ok path={} events={}",
            path.display(),
            events.len()
        );
        Ok(Self {
            path,
            events,
            _lock: lock,
        })
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    fn persist(&self) -> std::result::Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.events)
            .map_err(|e| StoreError::Backend(format!("serialize calendar: {}", e)))?;
        let backend = |e: std::io::Error| {
            StoreError::Backend(format!("write {}: {}", self.path.display(), e))
        };
        let mut tmp = NamedTempFile::new_in(directory_of(&self.path)).map_err(backend)?;
        tmp.write_all(json.as_bytes()).map_err(backend)?;
        tmp.as_file().sync_all().map_err(backend)?;
        tmp.persist(&self.path).map_err(|e| backend(e.error))?;
        Ok(())
    }

    fn position(&self, id: &EventId) -> Option<usize> {
        self.events.iter().position(|e| &e.id == id)
    }
}

fn directory_of(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

fn acquire_lock(path: &Path) -> Result<Option<File>> {
    if !directory_of(path).is_dir() {
        return Ok(None);
    }
    let mut lock_path = path.as_os_str().to_owned();
    lock_path.push(".lock");
    let lock_path = PathBuf::from(lock_path);

    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .with_context(|| format!("Failed to open lock file: {}", lock_path.display()))?;
    FileExt::lock_exclusive(&file)
        .with_context(|| format!("Failed to lock calendar: {}", path.display()))?;
    Ok(Some(file))
}

fn first_duplicate(events: &[Event]) -> Option<&EventId> {
    events
        .iter()
        .enumerate()
        .find(|(i, e)| events[..*i].iter().any(|prev| prev.id == e.id))
        .map(|(_, e)| &e.id)
}

impl EventStore for JsonFileStore {
    fn events_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| e.start < end && e.end > start)
            .cloned()
            .collect()
    }

    fn event_by_id(&self, id: &EventId) -> Option<Event> {
        self.position(id).map(|idx| self.events[idx].clone())
    }

    fn insert(&mut self, event: Event) -> std::result::Result<(), StoreError> {
        if !self.is_connected() {
            return Err(StoreError::Disconnected);
        }
        if self.position(&event.id).is_some() {
            return Err(StoreError::DuplicateId(event.id));
        }
        self.events.push(event);
        if let Err(err) = self.persist() {
            self.events.pop();
            return Err(err);
        }
        Ok(())
    }

    fn delete(&mut self, event: &Event) -> std::result::Result<(), StoreError> {
        if !self.is_connected() {
            return Err(StoreError::Disconnected);
        }
        let idx = self
            .position(&event.id)
            .ok_or_else(|| StoreError::Missing(event.id.clone()))?;
        let removed = self.events.remove(idx);
        if let Err(err) = self.persist() {
            self.events.insert(idx, removed);
            return Err(err);
        }
        Ok(())
    }

    /// The calendar is reachable while its directory exists.
    fn is_connected(&self) -> bool {
        directory_of(&self.path).is_dir()
    }
}

/// Identifier counter that continues after the highest `<prefix>-<n>` in `events`.
pub fn next_sequence(events: &[Event], prefix: &str) -> u64 {
    let marker = format!("{}-", prefix);
    events
        .iter()
        .filter_map(|e| e.id.as_str().strip_prefix(&marker))
        .filter_map(|n| n.parse::<u64>().ok())
        .max()
        .map_or(1, |n| n + 1)
}
