//! `schedule` CLI: book tasks and find free time in a JSON calendar file.
//!
//! ## Usage
//!
//! ```sh
//! # What is booked between 08:00 and 12:00?
//! schedule -c calendar.json list --from 2026-03-01T08:00:00 --to 2026-03-01T12:00:00
//!
//! # Free gaps, or the first gap of at least 45 minutes
//! schedule -c calendar.json free --from 2026-03-01T07:00:00 --to 2026-03-01T18:00:00
//! schedule -c calendar.json free --from 2026-03-01T07:00:00 --to 2026-03-01T18:00:00 --min-minutes 45
//!
//! # Book a task (fails with exit code 2 on conflict)
//! schedule -c calendar.json book --start 2026-03-01T09:30:00 --end 2026-03-01T10:00:00 --title Review
//!
//! # Move, defer or remove an existing task
//! schedule -c calendar.json move task-1 --start 2026-03-01T13:00:00 --end 2026-03-01T13:30:00
//! schedule -c calendar.json defer task-1 --by skip3
//! schedule -c calendar.json remove task-1
//!
//! # Overlaps written by other tools
//! schedule -c calendar.json conflicts --from 2026-03-01T00:00:00 --to 2026-03-02T00:00:00
//! ```
//!
//! Results are printed as JSON on stdout; diagnostics go to stderr.

mod file_store;

use std::process;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use flexi_logger::Logger;
use log::info;
use schedule_engine::{
    EventId, IdGenerator, NewTask, ScheduleError, Scheduler, SequentialIds, SortStatus, Task,
    UpdateFailure, UuidIds,
};
use serde::Serialize;

use crate::file_store::{next_sequence, JsonFileStore};

const SEQUENCE_PREFIX: &str = "task";

#[derive(Parser)]
#[command(
    name = "schedule",
    version,
    about = "Conflict-aware task scheduling over a JSON calendar"
)]
struct Cli {
    /// Calendar file (JSON array of {id, start, end}); created on first write
    #[arg(short, long, default_value = "calendar.json")]
    calendar: String,

    /// How identifiers are assigned to booked tasks
    #[arg(long, value_enum, default_value_t = IdStrategy::Uuid)]
    ids: IdStrategy,

    /// Log level or filter spec for stderr diagnostics (e.g. "info", "debug")
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum IdStrategy {
    /// Random UUIDs
    Uuid,
    /// task-1, task-2, ... continuing after the highest existing number
    Seq,
}

#[derive(Subcommand)]
enum Commands {
    /// List tasks overlapping a window
    List {
        #[arg(long, value_parser = parse_datetime)]
        from: DateTime<Utc>,
        #[arg(long, value_parser = parse_datetime)]
        to: DateTime<Utc>,
    },
    /// Show free time in a window
    Free {
        #[arg(long, value_parser = parse_datetime)]
        from: DateTime<Utc>,
        #[arg(long, value_parser = parse_datetime)]
        to: DateTime<Utc>,
        /// Only print the first gap lasting at least this many minutes
        #[arg(long)]
        min_minutes: Option<i64>,
    },
    /// Book a task if the range is free
    ///
    /// The calendar file stores only id, start and end. Title and sort are
    /// echoed in the output but not persisted.
    Book {
        #[arg(long, value_parser = parse_datetime)]
        start: DateTime<Utc>,
        #[arg(long, value_parser = parse_datetime)]
        end: DateTime<Utc>,
        /// Echoed in the output only
        #[arg(long)]
        title: Option<String>,
        /// Echoed in the output only
        #[arg(long, default_value_t = SortStatus::Unsorted)]
        sort: SortStatus,
    },
    /// Move an existing task to a new range
    Move {
        id: String,
        #[arg(long, value_parser = parse_datetime)]
        start: DateTime<Utc>,
        #[arg(long, value_parser = parse_datetime)]
        end: DateTime<Utc>,
    },
    /// Push an existing task back by a deferral classification
    Defer {
        id: String,
        /// skip1, skip3 or skip7
        #[arg(long)]
        by: SortStatus,
    },
    /// Remove a task
    Remove { id: String },
    /// List pairs of overlapping events in a window
    Conflicts {
        #[arg(long, value_parser = parse_datetime)]
        from: DateTime<Utc>,
        #[arg(long, value_parser = parse_datetime)]
        to: DateTime<Utc>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("Error: {:#}", err);
        let rejected = err
            .downcast_ref::<ScheduleError>()
            .is_some_and(ScheduleError::is_rejection);
        process::exit(if rejected { 2 } else { 1 });
    }
}

fn run(cli: Cli) -> Result<()> {
    let _logger = Logger::try_with_str(&cli.log_level)
        .with_context(|| format!("Invalid log level: {}", cli.log_level))?
        .log_to_stderr()
        .start()
        .context("Failed to start logger")?;

    let store = JsonFileStore::open(&cli.calendar)?;
    let ids: Box<dyn IdGenerator> = match cli.ids {
        IdStrategy::Uuid => Box::new(UuidIds),
        IdStrategy::Seq => Box::new(SequentialIds::starting_at(
            SEQUENCE_PREFIX,
            next_sequence(store.events(), SEQUENCE_PREFIX),
        )),
    };
    let mut scheduler = Scheduler::with_ids(store, ids);

    match cli.command {
        Commands::List { from, to } => {
            let mut tasks = scheduler.fetch(from, to);
            tasks.sort_by_key(|t| (t.start, t.end));
            print_json(&tasks)?;
        }
        Commands::Free {
            from,
            to,
            min_minutes,
        } => match min_minutes {
            Some(min) => print_json(&scheduler.first_free_slot(from, to, min))?,
            None => print_json(&scheduler.free_time_between(from, to))?,
        },
        Commands::Book {
            start,
            end,
            title,
            sort,
        } => {
            let request = NewTask {
                title,
                start,
                end,
                sort,
            };
            let task = scheduler
                .schedule(request)
                .context("Failed to book task")?;
            info!("booked {} in {}", task.id, cli.calendar);
            print_json(&task)?;
        }
        Commands::Move { id, start, end } => {
            let target = Task {
                id: EventId::from(id),
                title: None,
                start,
                end,
                sort: SortStatus::Unsorted,
            };
            let moved = scheduler
                .update(&target)
                .context("Failed to move task")?;
            print_json(&moved)?;
        }
        Commands::Defer { id, by } => {
            let Some(offset) = by.deferral() else {
                anyhow::bail!("'{}' is not a deferral; use skip1, skip3 or skip7", by);
            };
            let id = EventId::from(id);
            let current = scheduler
                .task(&id)
                .ok_or_else(|| ScheduleError::UpdateFailed {
                    id,
                    reason: UpdateFailure::Missing,
                })?;
            let mut deferred = current.rescheduled(current.start + offset, current.end + offset);
            deferred.sort = by;
            let moved = scheduler
                .update(&deferred)
                .context("Failed to defer task")?;
            print_json(&moved)?;
        }
        Commands::Remove { id } => {
            scheduler
                .remove(&id.as_str().into())
                .context("Failed to remove task")?;
            print_json(&serde_json::json!({ "removed": id }))?;
        }
        Commands::Conflicts { from, to } => {
            print_json(&scheduler.conflicts_between(from, to))?;
        }
    }

    Ok(())
}

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts both RFC 3339 (with timezone offset, e.g., "2026-02-17T14:00:00+00:00")
/// and naive time (e.g., "2026-02-17T14:00:00"), which is interpreted as UTC.
fn parse_datetime(s: &str) -> std::result::Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| format!("Invalid datetime '{}': {}", s, e))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
