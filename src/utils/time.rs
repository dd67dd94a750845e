//! Timestamp and duration helpers shared by the session engine and queries.
//!
//! Session timestamps are persisted as ISO-8601 text without timezone
//! (`YYYY-MM-DDTHH:MM:SS`), which sorts lexicographically and compares
//! correctly with SQLite's `date()` function.

use chrono::{NaiveDate, NaiveDateTime};

pub const TIMESTAMP_FMT: &str = "%Y-%m-%dT%H:%M:%S";
pub const DATE_FMT: &str = "%Y-%m-%d";

pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FMT).to_string()
}

/// Parse a stored timestamp, tolerating a fractional-seconds suffix left
/// behind by older releases.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, TIMESTAMP_FMT) {
        return Some(ts);
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FMT).ok()
}

/// Last representable second of a session's calendar day (23:59:59).
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(23, 59, 59).unwrap()
}

/// First second of a calendar day (00:00:00).
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(0, 0, 0).unwrap()
}

/// Whole seconds between start and end, clamped to zero when the clock
/// moved backwards between the two observations.
pub fn elapsed_seconds(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_seconds().max(0)
}

/// HH:MM:SS rendering used by `status` and `list`.
pub fn format_duration(seconds: i64) -> String {
    let s = seconds.max(0);
    format!("{:02}:{:02}:{:02}", s / 3600, (s % 3600) / 60, s % 60)
}
