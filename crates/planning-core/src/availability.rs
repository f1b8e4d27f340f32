//! Availability Engine — constructs the free-time grid by subtracting
//! fixed events from user-configured work windows (`spec.md` §4.B).

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};

use crate::grid::{ceil_15, floor_15, overlaps, HORIZON_DAYS};
use crate::types::{Settings, Slot, Task};

/// Enumerate free windows over the horizon, aligned to the 15-minute grid.
///
/// Empty output is not an error: it means no placement is possible within
/// the horizon.
pub fn free_windows(tasks: &[Task], now: DateTime<Utc>, settings: &Settings) -> Vec<Slot> {
    let fixed_events = fixed_events_by_day(tasks);
    let start_of_today = start_of_day(now);

    let mut windows = Vec::new();
    for day_offset in 0..HORIZON_DAYS {
        let day = start_of_today + Duration::days(day_offset);
        let weekday = day.weekday().num_days_from_sunday() as u8;
        if !settings.active_days.contains(&weekday) {
            continue;
        }

        let mut day_start = day
            .with_hour(settings.work_start_hour)
            .and_then(|d| d.with_minute(0))
            .and_then(|d| d.with_second(0))
            .map(ceil_15)
            .expect("valid work_start_hour");
        let day_end = day
            .with_hour(settings.work_end_hour)
            .and_then(|d| d.with_minute(0))
            .and_then(|d| d.with_second(0))
            .map(floor_15)
            .expect("valid work_end_hour");

        if day_end <= day_start {
            continue;
        }

        if day_offset == 0 {
            if now >= day_start && now < day_end {
                day_start = ceil_15(now);
            } else if now >= day_end {
                continue;
            }
        }

        let mut day_windows = vec![(day_start, day_end)];

        if let Some(events) = fixed_events.get(&day.date_naive()) {
            for (event_start, event_end) in events {
                if !overlaps(day_start, day_end, *event_start, *event_end) {
                    continue;
                }
                day_windows = day_windows
                    .into_iter()
                    .flat_map(|w| subtract_interval(w, *event_start, *event_end))
                    .collect();
            }
        }

        for (start, end) in day_windows {
            let snapped_start = ceil_15(start);
            let snapped_end = floor_15(end);
            if (snapped_end - snapped_start).num_minutes() >= 15 {
                windows.push(Slot::new(snapped_start, snapped_end));
            }
        }
    }

    windows
}

fn start_of_day(t: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(t.year(), t.month(), t.day(), 0, 0, 0)
        .single()
        .expect("valid start-of-day")
}

/// Index fixed events by calendar day: `is_fixed`, not `Done`, and with
/// both scheduled endpoints present.
fn fixed_events_by_day(
    tasks: &[Task],
) -> std::collections::HashMap<chrono::NaiveDate, Vec<(DateTime<Utc>, DateTime<Utc>)>> {
    use crate::types::Status;
    let mut by_day: std::collections::HashMap<chrono::NaiveDate, Vec<(DateTime<Utc>, DateTime<Utc>)>> =
        std::collections::HashMap::new();
    for task in tasks {
        if !task.is_fixed || task.status == Status::Done {
            continue;
        }
        if let (Some(start), Some(end)) = (task.scheduled_start, task.scheduled_end) {
            by_day.entry(start.date_naive()).or_default().push((start, end));
        }
    }
    by_day
}

/// Subtract `[cut_start, cut_end)` from `window`, producing 0, 1, or 2
/// remaining sub-windows.
fn subtract_interval(
    window: (DateTime<Utc>, DateTime<Utc>),
    cut_start: DateTime<Utc>,
    cut_end: DateTime<Utc>,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let (w_start, w_end) = window;
    if !overlaps(w_start, w_end, cut_start, cut_end) {
        return vec![window];
    }

    let mut out = Vec::new();
    if cut_start > w_start {
        out.push((w_start, cut_start.min(w_end)));
    }
    if cut_end < w_end {
        out.push((cut_end.max(w_start), w_end));
    }
    out
}
