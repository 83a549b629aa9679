//! Input conversions
//!
//! Date fields are edited as `YYYY-MM-DD` strings and list fields as comma or
//! newline separated text. Both directions live here so the form and the
//! table render the same canonical values.

use chrono::{DateTime, NaiveDate};
use serde_json::Value;

/// Calendar date as an input string (`YYYY-MM-DD`)
pub fn date_to_input_string(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a strict `YYYY-MM-DD` input string
///
/// Only the zero-padded form is accepted, which keeps
/// `date_to_input_string(input_string_to_date(s)?) == s` for every accepted `s`.
pub fn input_string_to_date(input: &str) -> Option<NaiveDate> {
    let s = input.trim();
    let bytes = s.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shape_ok {
        return None;
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Read a date from a backend value: `YYYY-MM-DD` or an RFC 3339 timestamp
pub fn date_from_value(value: &Value) -> Option<NaiveDate> {
    let s = value.as_str()?.trim();
    if let Some(date) = input_string_to_date(s) {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.naive_utc().date())
}

/// Split raw list input on commas and newlines, trimming and dropping empties
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Canonical display of a list field
pub fn join_list(items: &[String]) -> String {
    items.join(", ")
}
