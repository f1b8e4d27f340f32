//! Drift Detector — reports the maximum minutes by which `now` has
//! passed the scheduled end of an incomplete task (`spec.md` §4.H).

use chrono::{DateTime, Utc};

use crate::types::{Status, Task};

/// Maximum overrun, in minutes, across incomplete scheduled tasks. Zero
/// when nothing has drifted.
pub fn drift(tasks: &[Task], now: DateTime<Utc>) -> i64 {
    tasks
        .iter()
        .filter(|t| t.status != Status::Done)
        .filter_map(|t| t.scheduled_end)
        .filter(|&end| end < now)
        .map(|end| (now - end).num_minutes())
        .max()
        .unwrap_or(0)
}
