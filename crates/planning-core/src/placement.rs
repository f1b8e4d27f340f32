//! Placement Engine — greedily fits the ranked, dependency-aware task
//! queue into the slot grid, splitting tasks when necessary
//! (`spec.md` §4.E). This is the densest module in the crate.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Timelike, Utc};

use crate::grid::ceil_15;
use crate::ranker::{RankOutcome, TaskRanker};
use crate::types::{Energy, Priority, Slot, Task, UnscheduledTask};

/// Result of a placement pass, before the crate root assembles warnings.
pub struct PlacementResult {
    pub scheduled: Vec<Task>,
    pub unscheduled: Vec<UnscheduledTask>,
    /// Ids of project tasks scheduled past their own deadline, used by the
    /// caller to build the "pushed past deadlines" warning.
    pub project_tasks_past_deadline: usize,
}

/// Run the Placement Engine over `pending` tasks against `slots`.
///
/// `completion_times` is seeded by the caller with fixed/completed tasks'
/// ends and is mutated as tasks are placed.
pub fn place_tasks(
    pending: Vec<Task>,
    mut slots: Vec<Slot>,
    now: DateTime<Utc>,
    completion_times: &mut HashMap<String, DateTime<Utc>>,
) -> PlacementResult {
    let mut pending = pending;
    let mut scheduled = Vec::new();
    let mut unscheduled = Vec::new();
    let mut ranker = TaskRanker::new();
    let mut high_todo_scheduled = false;

    loop {
        let outcome = ranker.next(&pending, completion_times);
        let picked_id = match outcome {
            RankOutcome::Empty => break,
            RankOutcome::Blocked => {
                for task in pending.drain(..) {
                    unscheduled.push(UnscheduledTask {
                        task,
                        reason: "Dependency cycle or unresolved dependency blocks remaining tasks".to_string(),
                    });
                }
                break;
            }
            RankOutcome::Pick(task) => task.id.clone(),
        };

        let index = pending.iter().position(|t| t.id == picked_id).expect("picked task is pending");
        let task = pending.remove(index);

        match try_place(&task, now, &slots, completion_times) {
            Ok((parts, new_slots)) => {
                slots = new_slots;
                let last_end = parts.last().and_then(|p| p.scheduled_end).expect("placed part has an end");
                completion_times.insert(task.logical_id().to_string(), last_end);
                if task.priority == Priority::High && task.is_todo_list {
                    high_todo_scheduled = true;
                }
                scheduled.extend(parts);
            }
            Err(reason) => {
                unscheduled.push(UnscheduledTask { task, reason });
            }
        }
    }

    let project_tasks_past_deadline = if high_todo_scheduled {
        count_project_tasks_past_deadline(&scheduled)
    } else {
        0
    };

    PlacementResult {
        scheduled,
        unscheduled,
        project_tasks_past_deadline,
    }
}

fn count_project_tasks_past_deadline(scheduled: &[Task]) -> usize {
    let mut seen = HashSet::new();
    for task in scheduled {
        if task.is_todo_list {
            continue;
        }
        let Some(deadline_end) = task.deadline_end() else { continue };
        let Some(end) = task.scheduled_end else { continue };
        if end > deadline_end {
            seen.insert(task.logical_id().to_string());
        }
    }
    seen.len()
}

/// Try to place `task` into `slots`, returning the emitted parts and the
/// resulting slot list. On failure the caller's slot list is untouched —
/// all tentative splits are discarded (`spec.md` §4.E step 5).
fn try_place(
    task: &Task,
    now: DateTime<Utc>,
    slots: &[Slot],
    completion_times: &HashMap<String, DateTime<Utc>>,
) -> Result<(Vec<Task>, Vec<Slot>), String> {
    let earliest_floor = earliest_start_floor(task, now, completion_times);
    let latest_ceiling = latest_end_ceiling(task);

    let start_idx = choose_start_index(task, slots, earliest_floor, latest_ceiling);

    let mut working: Vec<Slot> = slots.to_vec();
    let mut parts: Vec<(DateTime<Utc>, DateTime<Utc>)> = Vec::new();
    let mut remaining = task.duration_minutes;
    let mut idx = start_idx;

    while idx < working.len() && remaining > 0 {
        let slot = working[idx];
        if slot.duration_minutes() < 15 {
            idx += 1;
            continue;
        }

        let usable_start = slot.start.max(ceil_15(earliest_floor));
        let usable_end = match latest_ceiling {
            Some(ceiling) => slot.end.min(ceiling),
            None => slot.end,
        };

        if usable_start >= usable_end || (usable_end - usable_start).num_minutes() < 15 {
            idx += 1;
            continue;
        }

        let usable_minutes = (usable_end - usable_start).num_minutes();
        let fit = remaining.min(usable_minutes);
        let consumed_end = usable_start + Duration::minutes(fit);

        parts.push((usable_start, consumed_end));
        remaining -= fit;

        let fully_removed = usable_start == slot.start && consumed_end == slot.end;
        let left_prefix = if usable_start > slot.start {
            Some(Slot::new(slot.start, usable_start))
        } else {
            None
        };
        let right_suffix = if consumed_end < slot.end {
            Some(Slot::new(consumed_end, slot.end))
        } else {
            None
        };

        match (left_prefix, right_suffix) {
            (None, None) => {
                working.remove(idx);
            }
            (None, Some(suffix)) => {
                working[idx] = suffix;
                idx += 1;
            }
            (Some(prefix), None) => {
                working[idx] = prefix;
                idx += 1;
            }
            (Some(prefix), Some(suffix)) => {
                working[idx] = prefix;
                working.insert(idx + 1, suffix);
                idx += 1;
            }
        }

        debug_assert!(fully_removed || left_prefix.is_some() || right_suffix.is_some() || remaining == 0);
    }

    if remaining > 0 {
        let reason = if latest_ceiling.is_some() {
            format!(
                "No slot before deadline/window ({})",
                latest_ceiling.unwrap().to_rfc3339()
            )
        } else {
            "Insufficient availability".to_string()
        };
        return Err(reason);
    }

    let split_count = parts.len();
    let total_parts = split_count as u32;
    let emitted: Vec<Task> = parts
        .into_iter()
        .enumerate()
        .map(|(i, (start, end))| {
            let part_index = (i + 1) as u32;
            let mut part = task.clone();
            if split_count > 1 {
                part.id = Task::split_id(&task.id, part_index);
                part.title = format!("{} ({})", task.title, part_index);
                part.original_task_id = Some(task.id.clone());
                part.part_index = Some(part_index);
                part.total_parts = Some(total_parts);
            }
            part.scheduled_start = Some(start);
            part.scheduled_end = Some(end);
            part.reason = Some(build_reason(task));
            part
        })
        .collect();

    Ok((emitted, working))
}

fn earliest_start_floor(
    task: &Task,
    now: DateTime<Utc>,
    completion_times: &HashMap<String, DateTime<Utc>>,
) -> DateTime<Utc> {
    let mut floor = now;
    if let Some(earliest) = task.earliest_start {
        floor = floor.max(earliest);
    }
    for dep in &task.dependencies {
        if let Some(&dep_end) = completion_times.get(dep) {
            floor = floor.max(dep_end);
        }
    }
    floor
}

fn latest_end_ceiling(task: &Task) -> Option<DateTime<Utc>> {
    match (task.deadline_end(), task.latest_end) {
        (Some(d), Some(l)) => Some(d.min(l)),
        (Some(d), None) => Some(d),
        (None, Some(l)) => Some(l),
        (None, None) => None,
    }
}

/// Choose the starting slot index. Energy-tagged tasks scan every slot
/// for the best-scoring usable start; untagged tasks always start at 0.
fn choose_start_index(
    task: &Task,
    slots: &[Slot],
    earliest_floor: DateTime<Utc>,
    latest_ceiling: Option<DateTime<Utc>>,
) -> usize {
    let Some(energy) = task.energy else { return 0 };

    let mut best: Option<(usize, i32, DateTime<Utc>)> = None;
    for (i, slot) in slots.iter().enumerate() {
        let usable_start = slot.start.max(ceil_15(earliest_floor));
        let usable_end = match latest_ceiling {
            Some(ceiling) => slot.end.min(ceiling),
            None => slot.end,
        };
        if usable_start >= usable_end || (usable_end - usable_start).num_minutes() < 15 {
            continue;
        }

        let score = energy_score(energy, usable_start.hour());
        let better = match best {
            None => true,
            Some((_, best_score, best_start)) => {
                score > best_score || (score == best_score && usable_start < best_start)
            }
        };
        if better {
            best = Some((i, score, usable_start));
        }
    }

    // No candidate fits: return an out-of-range index so the fitting loop
    // falls straight through to "remaining > 0" and reports a failure.
    best.map(|(i, _, _)| i).unwrap_or(slots.len())
}

/// Energy-fit score table (`spec.md` §4.E step 3).
fn energy_score(energy: Energy, hour: u32) -> i32 {
    match energy {
        Energy::High => {
            if hour < 11 {
                3
            } else if hour < 15 {
                2
            } else {
                1
            }
        }
        Energy::Medium => {
            if (10..16).contains(&hour) {
                3
            } else if (8..18).contains(&hour) {
                2
            } else {
                1
            }
        }
        Energy::Low => {
            if hour >= 15 {
                3
            } else if hour >= 12 {
                2
            } else {
                1
            }
        }
    }
}

fn build_reason(task: &Task) -> String {
    let mut parts = Vec::new();
    parts.push(format!("{:?} priority", task.priority));
    if let Some(energy) = task.energy {
        parts.push(format!("energy: {energy:?}"));
    }
    if task.earliest_start.is_some() || task.latest_end.is_some() || task.deadline.is_some() {
        parts.push("window constrained".to_string());
    }
    parts.join("; ")
}
