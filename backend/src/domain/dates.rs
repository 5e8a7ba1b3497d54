//! Date parsing shared by the services.
//!
//! Clients send either plain calendar days (`2024-01-31`) or full RFC 3339
//! timestamps. Timestamps are converted to UTC before the day is taken.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a day or a timestamp into a UTC instant. Plain days map to midnight UTC.
pub fn parse_instant(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Some(instant.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Calendar-day key of a day or timestamp
pub fn parse_day(input: &str) -> Option<NaiveDate> {
    parse_instant(input).map(|instant| instant.date_naive())
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn format_day(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}
