//! Shared value types: Task, Slot, Settings, Priority, Energy, Status.
//!
//! Moments are `chrono::DateTime<Utc>` throughout; the host owns the
//! ISO-8601 string boundary (§6, §9). Sum types are closed `enum`s so the
//! engines can pattern-match exhaustively instead of branching on strings.

use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::grid::GRID_MINUTES;

/// A task identifier, as assigned by the host.
pub type TaskId = String;

/// Project identifier used to mark synthesized break tasks, per §3.
pub const SYSTEM_BREAK_PROJECT: &str = "system-break";

/// Task priority. Serializes exactly as its variant name (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Weight used by the Task Ranker's score (§4.D).
    pub fn weight(self) -> i64 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "To Do")]
    Todo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Done")]
    Done,
}

/// Energy tag used by the Placement Engine's slot scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Energy {
    Low,
    Medium,
    High,
}

/// The scheduling unit. See `spec.md` §3 for the full invariant list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Planned duration in minutes; must be a positive multiple of 15.
    pub duration_minutes: i64,
    pub priority: Priority,
    pub status: Status,
    pub project_id: Option<String>,
    /// Calendar date deadline, interpreted as end-of-day.
    pub deadline: Option<NaiveDate>,
    pub scheduled_start: Option<DateTime<Utc>>,
    pub scheduled_end: Option<DateTime<Utc>>,
    /// `true` means this task is immovable; the scheduler never reassigns it.
    #[serde(default)]
    pub is_fixed: bool,
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
    pub energy: Option<Energy>,
    pub earliest_start: Option<DateTime<Utc>>,
    pub latest_end: Option<DateTime<Utc>>,
    /// Admits alternation priority in the Task Ranker (§4.D).
    #[serde(default)]
    pub is_todo_list: bool,
    /// Set by the Placement Engine when this task is the result of a split.
    pub original_task_id: Option<TaskId>,
    pub part_index: Option<u32>,
    pub total_parts: Option<u32>,
    /// Human-readable placement reason, set by the Placement Engine or Cascade Mover.
    pub reason: Option<String>,
}

impl Task {
    /// `{id}-part-{k}` per §3, so a host can collapse split parts on a
    /// later pass.
    pub fn split_id(original_id: &str, part_index: u32) -> String {
        format!("{original_id}-part-{part_index}")
    }

    /// The task's planned duration as a `chrono::Duration`.
    pub fn duration(&self) -> Duration {
        Duration::minutes(self.duration_minutes)
    }

    /// `deadline`, interpreted as the last instant of that calendar day
    /// (`spec.md` §3: "interpreted as end-of-day").
    pub fn deadline_end(&self) -> Option<DateTime<Utc>> {
        self.deadline.map(|d| {
            let next = d.succ_opt().unwrap_or(d);
            DateTime::<Utc>::from_naive_utc_and_offset(next.and_hms_opt(0, 0, 0).unwrap(), Utc)
        })
    }

    /// Whether this task's own `duration_minutes` is a positive multiple
    /// of the grid.
    pub fn has_valid_duration(&self) -> bool {
        self.duration_minutes > 0 && self.duration_minutes % GRID_MINUTES == 0
    }

    /// A stable id usable as a dependency-completion key: the original
    /// task id, even for a task that is itself a split part.
    pub fn logical_id(&self) -> &str {
        self.original_task_id.as_deref().unwrap_or(&self.id)
    }
}

/// An available interval on the grid. Slots never overlap within a single
/// Availability Engine output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Slot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Category of a synthesized break, used to pick its duration in the
/// Rhythm Engine (§4.C).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakKind {
    Short,
    Long,
}

/// A synthesized break, emitted only by the Rhythm Engine. Carries the
/// system-break project marker so downstream components exclude it from
/// workload and conflict accounting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakTask {
    pub id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub kind: BreakKind,
}

impl BreakTask {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// The project marker carried by every break, per §3.
    pub fn project_id(&self) -> &'static str {
        SYSTEM_BREAK_PROJECT
    }
}

/// User-configured scheduling settings (§3, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub work_start_hour: u32,
    pub work_end_hour: u32,
    /// Subset of 0..6, 0 = Sunday.
    pub active_days: HashSet<u8>,
    pub enable_chunking: bool,
    pub focus_chunk_minutes: i64,
    pub short_break_minutes: i64,
    pub long_break_minutes: i64,
    /// A long break follows every Nth focus chunk.
    pub long_break_cadence: u32,
    pub default_task_duration: i64,
    pub planning_buffer_minutes: i64,
    pub auto_reschedule_overdue: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_start_hour: 9,
            work_end_hour: 17,
            active_days: (0..=6).collect(),
            enable_chunking: false,
            focus_chunk_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            long_break_cadence: 4,
            default_task_duration: 30,
            planning_buffer_minutes: 0,
            auto_reschedule_overdue: false,
        }
    }
}

/// A task the Placement Engine could not place, with a human-readable
/// reason (§4.E, §7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnscheduledTask {
    pub task: Task,
    pub reason: String,
}

/// The result of a full placement pass (§6).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlanOutput {
    pub scheduled: Vec<Task>,
    pub breaks: Vec<BreakTask>,
    pub unscheduled: Vec<UnscheduledTask>,
    pub warnings: Vec<String>,
}
