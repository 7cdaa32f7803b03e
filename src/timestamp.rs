//! Date/time text parsing shared by the resolver and the era pipelines.
//!
//! Every parser returns `None` on failure; an unparseable timestamp is a
//! data-quality condition, never an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Candidate layouts for a combined `"{date} {time}"` string, in priority
/// order (month-first before day-first).
pub const COMBINED_FORMATS: [&str; 3] = ["%m/%d/%Y %H:%M:%S", "%d/%m/%Y %H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Best-effort layouts with a time component.
const DATETIME_FALLBACK_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M",
    "%d %b %Y - %H:%M",
    "%d %b %Y %H:%M",
    "%d %B %Y %H:%M",
    "%d %b %Y %H:%M:%S",
];

/// Best-effort date-only layouts, taken at midnight.
const DATE_FALLBACK_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%d %b %Y", "%d %B %Y"];

/// Day-first layouts tried before the generic fallbacks.
const DAY_FIRST_DATETIME_FORMATS: &[&str] = &["%d/%m/%Y %H:%M", "%d/%m/%Y %H:%M:%S", "%d-%m-%Y %H:%M"];
const DAY_FIRST_DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d %b %Y", "%d %B %Y"];

fn is_missing_token(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("nan")
}

/// Combine a date string and a time string into one timestamp.
///
/// Blank or literal `none` on either side yields `None`. The combined text
/// is tried against [`COMBINED_FORMATS`] first, then free-form parsing.
pub fn combine_date_time(date: Option<&str>, time: Option<&str>) -> Option<NaiveDateTime> {
    let (date, time) = (date?.trim(), time?.trim());
    if is_missing_token(date) || is_missing_token(time) {
        return None;
    }

    let combined = format!("{} {}", date, time);
    COMBINED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&combined, fmt).ok())
        .or_else(|| parse_timestamp(&combined))
}

/// Free-form timestamp parsing (month-first where ambiguous).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if is_missing_token(s) {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    COMBINED_FORMATS
        .iter()
        .chain(DATETIME_FALLBACK_FORMATS)
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| parse_date_only(s, DATE_FALLBACK_FORMATS))
}

/// Day-first timestamp parsing, for sources that write `18/12/2022`.
pub fn parse_day_first(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if is_missing_token(s) {
        return None;
    }

    DAY_FIRST_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| parse_date_only(s, DAY_FIRST_DATE_FORMATS))
        .or_else(|| parse_timestamp(s))
}

fn parse_date_only(s: &str, formats: &[&str]) -> Option<NaiveDateTime> {
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .map(|d| d.and_time(NaiveTime::MIN))
}
