//! Core error types for planning-core.
//!
//! The scheduler surfaces only input-invariant violations as errors; every
//! other failure mode (an unplaceable task, a dependency cycle) is carried
//! in the successful [`crate::PlanOutput`] instead. See `spec.md` §7.

use thiserror::Error;

/// Top-level error type returned by the core's entry points.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The input snapshot violated one of the invariants in §3/§6.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Input-invariant violations that cause the core to reject a `plan` pass
/// with no partial output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A task's duration is not a positive multiple of the 15-minute grid.
    #[error("Task '{task_id}' has duration {minutes} minutes, which is not a positive multiple of 15")]
    InvalidDuration { task_id: String, minutes: i64 },

    /// A task's scheduled start is not strictly before its scheduled end.
    #[error("Task '{task_id}' has scheduled start ({start}) not before its scheduled end ({end})")]
    InvalidScheduledRange {
        task_id: String,
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },

    /// A task's earliest-start window comes after its latest-end window.
    #[error("Task '{task_id}' has earliest_start ({earliest}) after latest_end ({latest})")]
    InvalidWindow {
        task_id: String,
        earliest: chrono::DateTime<chrono::Utc>,
        latest: chrono::DateTime<chrono::Utc>,
    },

    /// `work_end_hour` does not exceed `work_start_hour`.
    #[error("Settings have work_end_hour ({end}) not after work_start_hour ({start})")]
    InvalidWorkHours { start: u32, end: u32 },
}

/// Result type alias for [`CoreError`].
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
