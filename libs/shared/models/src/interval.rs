//! Half-open interval and time-of-day primitives shared by every
//! scheduling decision in the engine.

use chrono::NaiveTime;

/// Two half-open intervals `[start, end)` overlap when each starts before
/// the other ends. Zero-duration intervals never overlap anything.
///
/// Time-of-day values are passed as their stored `HH:MM` / `HH:MM:SS`
/// strings; the fixed-width format keeps lexicographic comparison in step
/// with chronological order.
pub fn overlaps<T: PartialOrd>(start_a: T, end_a: T, start_b: T, end_b: T) -> bool {
    start_a < end_a && start_b < end_b && start_a < end_b && start_b < end_a
}

/// Parse a time-of-day in either `HH:MM:SS` or `HH:MM` form.
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}
