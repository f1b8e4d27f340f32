//! Rhythm Engine — subdivides free windows into alternating focus slots
//! and break tasks per user settings (`spec.md` §4.C).

use chrono::Duration;
use uuid::Uuid;

use crate::grid::round_15;
use crate::types::{BreakKind, BreakTask, Settings, Slot};

/// Output of a rhythm pass: the work-slot grid the Placement Engine fits
/// tasks into, plus the breaks synthesized alongside it.
pub struct RhythmOutput {
    pub work_slots: Vec<Slot>,
    pub breaks: Vec<BreakTask>,
}

/// Walk every free window, carving focus slots and break tasks.
///
/// The cadence counter is shared across windows within a single call, as
/// `spec.md` §4.C requires ("shared across windows within a plan").
pub fn apply_rhythm(free_windows: &[Slot], settings: &Settings) -> RhythmOutput {
    if !settings.enable_chunking {
        return RhythmOutput {
            work_slots: free_windows.to_vec(),
            breaks: Vec::new(),
        };
    }

    let mut work_slots = Vec::new();
    let mut breaks = Vec::new();
    let mut cadence_counter: u32 = 0;
    let cadence = settings.long_break_cadence.max(2);

    for window in free_windows {
        let mut cursor = window.start;

        while (window.end - cursor).num_minutes() >= 15 {
            let remaining = (window.end - cursor).num_minutes();
            let focus_len = round_15(settings.focus_chunk_minutes).min(floor_to_15(remaining));
            if focus_len < 15 {
                break;
            }

            let focus_end = cursor + Duration::minutes(focus_len);
            work_slots.push(Slot::new(cursor, focus_end));
            cursor = focus_end;
            cadence_counter += 1;

            let remaining_after_focus = (window.end - cursor).num_minutes();
            if remaining_after_focus >= 15 {
                let is_long = cadence_counter % cadence == 0;
                let raw_break = if is_long {
                    round_15(settings.long_break_minutes)
                } else {
                    round_15(settings.short_break_minutes)
                };
                let clamped = raw_break.min(floor_to_15(remaining_after_focus));

                if clamped >= 15 {
                    let break_end = cursor + Duration::minutes(clamped);
                    breaks.push(BreakTask {
                        id: Uuid::new_v4().to_string(),
                        start: cursor,
                        end: break_end,
                        kind: if is_long { BreakKind::Long } else { BreakKind::Short },
                    });
                    cursor = break_end;
                } else {
                    // Remainder too small for a grid-aligned break; it is
                    // consumed implicitly rather than left dangling.
                    cursor = window.end;
                }
            }
        }
    }

    RhythmOutput { work_slots, breaks }
}

fn floor_to_15(minutes: i64) -> i64 {
    (minutes / 15) * 15
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn dt(h: u32, mi: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, h, mi, 0).unwrap()
    }

    fn settings(chunk: i64, short: i64, long: i64, cadence: u32) -> Settings {
        Settings {
            enable_chunking: true,
            focus_chunk_minutes: chunk,
            short_break_minutes: short,
            long_break_minutes: long,
            long_break_cadence: cadence,
            ..Settings::default()
        }
    }

    #[test]
    fn chunking_disabled_passes_windows_through() {
        let windows = vec![Slot::new(dt(9, 0), dt(12, 0))];
        let mut s = Settings::default();
        s.enable_chunking = false;
        let out = apply_rhythm(&windows, &s);
        assert_eq!(out.work_slots, windows);
        assert!(out.breaks.is_empty());
    }

    #[test]
    fn s4_chunking_cadence_scenario() {
        // settings {work 09-12, chunk=30, short=15, long=30, cadence=2}.
        // The first three focus slots and first two breaks must follow the
        // documented cadence; the 3h window keeps going after that, which
        // the scenario in spec.md simply doesn't enumerate.
        let windows = vec![Slot::new(dt(9, 0), dt(12, 0))];
        let s = settings(30, 15, 30, 2);
        let out = apply_rhythm(&windows, &s);

        assert_eq!(
            &out.work_slots[..3],
            &[
                Slot::new(dt(9, 0), dt(9, 30)),
                Slot::new(dt(9, 45), dt(10, 15)),
                Slot::new(dt(10, 45), dt(11, 15)),
            ]
        );
        assert!(out.breaks.len() >= 2);
        assert_eq!(out.breaks[0].start, dt(9, 30));
        assert_eq!(out.breaks[0].end, dt(9, 45));
        assert_eq!(out.breaks[0].kind, BreakKind::Short);
        assert_eq!(out.breaks[1].start, dt(10, 15));
        assert_eq!(out.breaks[1].end, dt(10, 45));
        assert_eq!(out.breaks[1].kind, BreakKind::Long);

        // The window is fully consumed (180 minutes of grid-aligned slots
        // and breaks), none of it left dangling.
        let total: i64 = out.work_slots.iter().map(|s| s.duration_minutes()).sum::<i64>()
            + out.breaks.iter().map(|b| b.duration_minutes()).sum::<i64>();
        assert_eq!(total, 180);
    }

    #[test]
    fn cadence_counter_shared_across_windows() {
        let windows = vec![
            Slot::new(dt(9, 0), dt(9, 30)),
            Slot::new(dt(13, 0), dt(13, 30)),
        ];
        let s = settings(30, 15, 45, 2);
        let out = apply_rhythm(&windows, &s);
        // Two focus slots total, no room for a break in either 30m window,
        // but the counter still advances across the gap between windows.
        assert_eq!(out.work_slots.len(), 2);
        assert!(out.breaks.is_empty());
    }
}
