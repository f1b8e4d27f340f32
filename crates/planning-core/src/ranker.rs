//! Task Ranker — computes the ready set and the priority/deadline score
//! the Placement Engine uses to pick its next task (`spec.md` §4.D).

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::types::Task;

/// What the ranker found on a given call.
pub enum RankOutcome<'a> {
    /// The task to place next.
    Pick(&'a Task),
    /// The ready set is empty while pending tasks remain: a dependency
    /// cycle or an unresolved dependency.
    Blocked,
    /// Nothing left to rank.
    Empty,
}

/// Computes the ready set and picks the next task to place, alternating
/// between to-do-list tasks and project tasks.
#[derive(Default)]
pub struct TaskRanker {
    /// `true` on a "to-do turn". Flipped after every non-override pick.
    todo_turn: bool,
}

impl TaskRanker {
    pub fn new() -> Self {
        Self { todo_turn: true }
    }

    /// Score used to order a single queue: priority weight, then a bonus
    /// for having a deadline, then a bonus for having a latest-end window.
    fn score(task: &Task) -> i64 {
        let mut s = task.priority.weight() * 100;
        if task.deadline.is_some() {
            s += 50;
        }
        if task.latest_end.is_some() {
            s += 60;
        }
        s
    }

    fn sort_queue(queue: &mut [&Task]) {
        queue.sort_by(|a, b| {
            Self::score(b)
                .cmp(&Self::score(a))
                .then_with(|| match (a.deadline, b.deadline) {
                    (Some(ad), Some(bd)) => ad.cmp(&bd),
                    _ => Ordering::Equal,
                })
                .then_with(|| b.duration_minutes.cmp(&a.duration_minutes))
        });
    }

    fn is_ready(task: &Task, pending: &[Task], completion_times: &HashMap<String, DateTime<Utc>>) -> bool {
        task.dependencies.iter().all(|dep| {
            completion_times.contains_key(dep) || !pending.iter().any(|p| &p.id == dep)
        })
    }

    /// Pick the next task to place out of `pending`, given the current
    /// dependency-completion map.
    pub fn next<'a>(
        &mut self,
        pending: &'a [Task],
        completion_times: &HashMap<String, DateTime<Utc>>,
    ) -> RankOutcome<'a> {
        if pending.is_empty() {
            return RankOutcome::Empty;
        }

        let ready: Vec<&Task> = pending
            .iter()
            .filter(|t| Self::is_ready(t, pending, completion_times))
            .collect();

        if ready.is_empty() {
            return RankOutcome::Blocked;
        }

        let mut todo_list: Vec<&Task> = ready.iter().copied().filter(|t| t.is_todo_list).collect();
        let mut project: Vec<&Task> = ready.iter().copied().filter(|t| !t.is_todo_list).collect();
        Self::sort_queue(&mut todo_list);
        Self::sort_queue(&mut project);

        if let Some(urgent) = todo_list.iter().find(|t| t.deadline.is_some()) {
            // Urgent-deadline override bypasses the alternation toggle.
            return RankOutcome::Pick(urgent);
        }

        let pick = if self.todo_turn {
            todo_list.first().or_else(|| project.first())
        } else {
            project.first().or_else(|| todo_list.first())
        };

        match pick {
            Some(task) => {
                self.todo_turn = !self.todo_turn;
                RankOutcome::Pick(task)
            }
            None => RankOutcome::Blocked,
        }
    }
}
