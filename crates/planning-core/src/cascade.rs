//! Cascade Mover — propagates a manual move through the dependency graph
//! in both directions (`spec.md` §4.F).

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::types::{Task, TaskId};

const MOVE_REASON: &str = "Manually moved by user";

/// Move `target_id` to `new_start` and propagate the change through
/// successors (pushed forward) and predecessors (pulled backward).
///
/// Uses an explicit stack with a visited set rather than recursion, since
/// depth can approach the task count and cycles must terminate
/// (`spec.md` §9).
pub fn cascade_move(tasks: &[Task], target_id: &str, new_start: DateTime<Utc>) -> Vec<Task> {
    let mut output: Vec<Task> = tasks.to_vec();
    let mut visited: HashSet<TaskId> = HashSet::new();
    let mut stack: Vec<(TaskId, DateTime<Utc>)> = vec![(target_id.to_string(), new_start)];

    while let Some((id, start)) = stack.pop() {
        if visited.contains(&id) {
            continue;
        }
        visited.insert(id.clone());

        let Some(idx) = output.iter().position(|t| t.id == id) else { continue };
        let duration = output[idx].duration();
        let end = start + duration;

        output[idx].scheduled_start = Some(start);
        output[idx].scheduled_end = Some(end);
        output[idx].is_fixed = true;
        output[idx].reason = Some(MOVE_REASON.to_string());

        // Push successors: tasks depending on this one move forward if
        // their current start would overlap the new end.
        for task in &output {
            if task.dependencies.iter().any(|d| d == &id) {
                let needs_push = match task.scheduled_start {
                    Some(s) => s < end,
                    None => false,
                };
                if needs_push {
                    stack.push((task.id.clone(), end));
                }
            }
        }

        // Pull predecessors: dependencies of this task move backward if
        // they currently run past the new start.
        let deps = output[idx].dependencies.clone();
        for dep_id in deps {
            if let Some(dep) = output.iter().find(|t| t.id == dep_id) {
                if let Some(dep_end) = dep.scheduled_end {
                    if dep_end > start {
                        stack.push((dep_id, start - dep.duration()));
                    }
                }
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Priority, Status};
    use chrono::TimeZone;

    fn dt(h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, h, mi, 0).unwrap()
    }

    fn task(id: &str, minutes: i64, deps: &[&str], start: Option<DateTime<Utc>>) -> Task {
        Task {
            id: id.into(),
            title: id.into(),
            duration_minutes: minutes,
            priority: Priority::Medium,
            status: Status::Todo,
            project_id: None,
            deadline: None,
            scheduled_start: start,
            scheduled_end: start.map(|s| s + chrono::Duration::minutes(minutes)),
            is_fixed: false,
            dependencies: deps.iter().map(|s| s.to_string()).collect(),
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
    fn s6_cascade_push_scenario() {
        let tasks = vec![
            task("a", 60, &[], Some(dt(10, 0))),
            task("b", 60, &["a"], Some(dt(11, 0))),
        ];
        let moved = cascade_move(&tasks, "a", dt(10, 30));
        let a = moved.iter().find(|t| t.id == "a").unwrap();
        let b = moved.iter().find(|t| t.id == "b").unwrap();
        assert_eq!(a.scheduled_start, Some(dt(10, 30)));
        assert_eq!(a.scheduled_end, Some(dt(11, 30)));
        assert_eq!(b.scheduled_start, Some(dt(11, 30)));
        assert_eq!(b.scheduled_end, Some(dt(12, 30)));
    }

    #[test]
    fn pulls_predecessor_when_it_would_overlap() {
        let tasks = vec![
            task("a", 60, &[], Some(dt(9, 0))),
            task("b", 60, &["a"], Some(dt(9, 30))),
        ];
        let moved = cascade_move(&tasks, "b", dt(9, 30));
        let a = moved.iter().find(|t| t.id == "a").unwrap();
        // a ran 9:00-10:00, overlapping b's unchanged 9:30 start, so a is
        // pulled back to end exactly when b starts.
        assert_eq!(a.scheduled_end, Some(dt(9, 30)));
        assert_eq!(a.scheduled_start, Some(dt(8, 30)));
    }

    #[test]
    fn terminates_on_a_dependency_cycle() {
        let tasks = vec![
            task("a", 30, &["b"], Some(dt(9, 0))),
            task("b", 30, &["a"], Some(dt(9, 30))),
        ];
        // Must return rather than loop forever.
        let moved = cascade_move(&tasks, "a", dt(10, 0));
        assert_eq!(moved.len(), 2);
    }

    #[test]
    fn idempotent_on_its_own_existing_start() {
        let tasks = vec![task("a", 30, &[], Some(dt(9, 0)))];
        let first = cascade_move(&tasks, "a", dt(9, 0));
        let second = cascade_move(&first, "a", dt(9, 0));
        assert_eq!(first[0].scheduled_start, second[0].scheduled_start);
        assert_eq!(first[0].scheduled_end, second[0].scheduled_end);
        assert_eq!(first[0].is_fixed, second[0].is_fixed);
    }
}
