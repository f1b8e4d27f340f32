//! Time grid primitives.
//!
//! All scheduling arithmetic happens on a 15-minute grid anchored to the
//! Unix epoch. Every function here zeroes sub-minute fields before
//! rounding, so a moment with stray seconds/nanoseconds never survives a
//! grid operation.

use chrono::{DateTime, TimeZone, Utc};

/// The scheduling grid, in minutes. Fixed at compile time per `spec.md` §6.
pub const GRID_MINUTES: i64 = 15;

/// How far into the future the Availability Engine enumerates free windows.
pub const HORIZON_DAYS: i64 = 180;

fn whole_minute_timestamp(t: DateTime<Utc>) -> i64 {
    let secs = t.timestamp();
    secs - secs.rem_euclid(60)
}

/// Round a moment forward to the next 15-minute boundary. Identity when
/// `t` already lies on the grid.
pub fn ceil_15(t: DateTime<Utc>) -> DateTime<Utc> {
    let minute_secs = whole_minute_timestamp(t);
    let grid_secs = GRID_MINUTES * 60;
    let rem = minute_secs.rem_euclid(grid_secs);
    let floored = minute_secs - rem;
    let ceiled = if rem == 0 && t.timestamp() == minute_secs {
        floored
    } else {
        floored + grid_secs
    };
    Utc.timestamp_opt(ceiled, 0).single().expect("valid ceil_15 timestamp")
}

/// Round a moment back to the previous 15-minute boundary.
pub fn floor_15(t: DateTime<Utc>) -> DateTime<Utc> {
    let minute_secs = whole_minute_timestamp(t);
    let grid_secs = GRID_MINUTES * 60;
    let floored = minute_secs - minute_secs.rem_euclid(grid_secs);
    Utc.timestamp_opt(floored, 0).single().expect("valid floor_15 timestamp")
}

/// Round a minute count to the nearest 15, with a floor of 15.
pub fn round_15(minutes: i64) -> i64 {
    if minutes <= 15 {
        return 15;
    }
    let rounded = ((minutes as f64) / (GRID_MINUTES as f64)).round() as i64 * GRID_MINUTES;
    rounded.max(GRID_MINUTES)
}

/// Half-open interval overlap with strictly positive measure.
pub fn overlaps(a_start: DateTime<Utc>, a_end: DateTime<Utc>, b_start: DateTime<Utc>, b_end: DateTime<Utc>) -> bool {
    a_start < b_end && b_start < a_end
}

/// Whether a moment already lies on the 15-minute grid.
pub fn is_aligned(t: DateTime<Utc>) -> bool {
    t == floor_15(t)
}
