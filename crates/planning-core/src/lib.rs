//! # Planning Core
//!
//! The deterministic scheduling core of a personal productivity
//! application. Given a snapshot of tasks, fixed events, the current
//! moment, and user settings, [`plan`] places tasks onto a 15-minute time
//! grid subject to working hours, dependencies, priorities, energy
//! profiles, time windows, and a focus/break chunking rhythm.
//!
//! ## Architecture
//!
//! - [`availability`]: builds the free-time grid by subtracting fixed
//!   events from configured work windows.
//! - [`rhythm`]: subdivides free windows into focus slots and break tasks.
//! - [`ranker`] + [`placement`]: rank the pending queue and greedily fit
//!   it into the slot grid, splitting tasks across windows when needed.
//! - [`cascade`]: propagates a manual move through the dependency graph.
//! - [`conflict`]: removes overlaps among already-scheduled tasks.
//! - [`drift`]: reports how far `now` has slipped past incomplete tasks.
//!
//! Everything here is a pure function over an immutable snapshot: no
//! shared mutable state, no async, no cancellation (`spec.md` §5). UI
//! panels, persistence, notifications, and ingestion are host concerns
//! that sit outside this crate.

pub mod availability;
pub mod cascade;
pub mod conflict;
pub mod drift;
pub mod error;
pub mod grid;
pub mod placement;
pub mod ranker;
pub mod rhythm;
pub mod types;

pub use error::{CoreError, Result, ValidationError};
pub use types::{
    BreakKind, BreakTask, Energy, PlanOutput, Priority, Settings, Slot, Status, Task, TaskId,
    UnscheduledTask, SYSTEM_BREAK_PROJECT,
};

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use types::Task as TaskType;

/// Run a full placement pass over `tasks` given `now` and `settings`.
///
/// This is the crate's primary entry point (`spec.md` §6). It rejects the
/// whole pass with [`CoreError::Validation`] on an input-invariant
/// violation; any other placement failure (an unplaceable task, a
/// dependency cycle) is reported inside a successful [`PlanOutput`]
/// instead.
pub fn plan(tasks: &[Task], now: DateTime<Utc>, settings: &Settings) -> Result<PlanOutput> {
    validate(tasks, settings)?;

    let free = availability::free_windows(tasks, now, settings);
    let rhythm::RhythmOutput { work_slots, breaks } = rhythm::apply_rhythm(&free, settings);

    let mut completion_times = seed_completion_times(tasks, now);
    let pending: Vec<Task> = tasks
        .iter()
        .filter(|t| t.status != Status::Done && !t.is_fixed)
        .cloned()
        .collect();

    let result = placement::place_tasks(pending, work_slots, now, &mut completion_times);

    let mut warnings = Vec::new();
    if result.project_tasks_past_deadline > 0 {
        warnings.push(format!(
            "High-priority to-dos pushed {} project task(s) past deadlines.",
            result.project_tasks_past_deadline
        ));
    }

    Ok(PlanOutput {
        scheduled: result.scheduled,
        breaks,
        unscheduled: result.unscheduled,
        warnings,
    })
}

/// Propagate a manual move of `target_id` to `new_start` through the
/// dependency graph, pushing successors forward and pulling predecessors
/// backward (`spec.md` §4.F, §6).
pub fn cascade_move(tasks: &[Task], target_id: &str, new_start: DateTime<Utc>) -> Vec<Task> {
    cascade::cascade_move(tasks, target_id, new_start)
}

/// Right-shift overlapping scheduled tasks until no two overlap
/// (`spec.md` §4.G, §6).
pub fn resolve_conflicts(tasks: &[Task]) -> Vec<Task> {
    conflict::resolve_conflicts(tasks)
}

/// Maximum overrun, in minutes, across incomplete scheduled tasks
/// (`spec.md` §4.H, §6).
pub fn drift(tasks: &[Task], now: DateTime<Utc>) -> i64 {
    drift::drift(tasks, now)
}

fn seed_completion_times(tasks: &[Task], now: DateTime<Utc>) -> HashMap<String, DateTime<Utc>> {
    let mut map = HashMap::new();
    for task in tasks {
        if task.status == Status::Done {
            map.insert(task.logical_id().to_string(), task.scheduled_end.unwrap_or(now));
        } else if task.is_fixed {
            if let Some(end) = task.scheduled_end {
                map.insert(task.logical_id().to_string(), end);
            }
        }
    }
    map
}

fn validate(tasks: &[Task], settings: &Settings) -> Result<()> {
    if settings.work_end_hour <= settings.work_start_hour {
        return Err(ValidationError::InvalidWorkHours {
            start: settings.work_start_hour,
            end: settings.work_end_hour,
        }
        .into());
    }

    for task in tasks {
        validate_task(task)?;
    }

    Ok(())
}

fn validate_task(task: &TaskType) -> Result<()> {
    if !task.has_valid_duration() {
        return Err(ValidationError::InvalidDuration {
            task_id: task.id.clone(),
            minutes: task.duration_minutes,
        }
        .into());
    }

    if let (Some(start), Some(end)) = (task.scheduled_start, task.scheduled_end) {
        if start >= end {
            return Err(ValidationError::InvalidScheduledRange {
                task_id: task.id.clone(),
                start,
                end,
            }
            .into());
        }
    }

    if let (Some(earliest), Some(latest)) = (task.earliest_start, task.latest_end) {
        if earliest > latest {
            return Err(ValidationError::InvalidWindow {
                task_id: task.id.clone(),
                earliest,
                latest,
            }
            .into());
        }
    }

    Ok(())
}
