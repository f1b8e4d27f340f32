//! Conflict Resolver — right-shifts overlapping scheduled tasks to
//! eliminate overlap (`spec.md` §4.G).

use crate::types::{Status, Task};

const RESOLVE_REASON: &str = "Auto-resolved conflict";

/// Sort incomplete scheduled tasks by start and shift any that overlap
/// their predecessor to start right after it, preserving duration.
pub fn resolve_conflicts(tasks: &[Task]) -> Vec<Task> {
    let mut output: Vec<Task> = tasks.to_vec();

    let mut indices: Vec<usize> = output
        .iter()
        .enumerate()
        .filter(|(_, t)| t.status != Status::Done && t.scheduled_start.is_some() && t.scheduled_end.is_some())
        .map(|(i, _)| i)
        .collect();
    indices.sort_by_key(|&i| output[i].scheduled_start.unwrap());

    let mut cursor = None;
    for &i in &indices {
        let start = output[i].scheduled_start.unwrap();
        let duration = output[i].duration();

        if let Some(current_end) = cursor {
            if start < current_end {
                output[i].scheduled_start = Some(current_end);
                output[i].scheduled_end = Some(current_end + duration);
                output[i].is_fixed = true;
                output[i].reason = Some(RESOLVE_REASON.to_string());
            }
        }

        cursor = output[i].scheduled_end;
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Priority;
    use chrono::{DateTime, TimeZone, Utc};

    fn dt(h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, h, mi, 0).unwrap()
    }

    fn task(id: &str, start: DateTime<Utc>, minutes: i64) -> Task {
        Task {
            id: id.into(),
            title: id.into(),
            duration_minutes: minutes,
            priority: Priority::Medium,
            status: Status::Todo,
            project_id: None,
            deadline: None,
            scheduled_start: Some(start),
            scheduled_end: Some(start + chrono::Duration::minutes(minutes)),
            is_fixed: false,
            dependencies: vec![],
            energy: None,
            earliest_start: None,
            latest_end: None,
            is_todo_list: false,
            original_task_id: None,
            part_index: None,
            total_parts: None,
            reason: None,
        }
    }

    #[test]
    fn shifts_overlapping_task_forward() {
        let tasks = vec![task("a", dt(9, 0), 60), task("b", dt(9, 30), 30)];
        let resolved = resolve_conflicts(&tasks);
        let b = resolved.iter().find(|t| t.id == "b").unwrap();
        assert_eq!(b.scheduled_start, Some(dt(10, 0)));
        assert_eq!(b.scheduled_end, Some(dt(10, 30)));
        assert!(b.is_fixed);
    }

    #[test]
    fn fixed_point_on_second_application() {
        let tasks = vec![task("a", dt(9, 0), 60), task("b", dt(9, 30), 30), task("c", dt(9, 45), 15)];
        let once = resolve_conflicts(&tasks);
        let twice = resolve_conflicts(&once);
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.scheduled_start, b.scheduled_start);
            assert_eq!(a.scheduled_end, b.scheduled_end);
        }
    }

    #[test]
    fn leaves_non_overlapping_tasks_untouched() {
        let tasks = vec![task("a", dt(9, 0), 30), task("b", dt(10, 0), 30)];
        let resolved = resolve_conflicts(&tasks);
        assert_eq!(resolved[1].scheduled_start, Some(dt(10, 0)));
        assert!(!resolved[1].is_fixed);
    }
}
