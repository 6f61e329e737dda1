use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::model::attendance::AttendanceStatus;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid date regex"));

/// Trimmed input, or `""` when the value is absent. Empty means "missing" everywhere.
pub fn trim_string(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn is_valid_date(value: &str) -> bool {
    parse_date(value).is_some()
}

/// `YYYY-MM-DD` naming a real calendar day. `2024-02-30` is rejected rather than rolled over.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if !DATE_RE.is_match(value) {
        return None;
    }

    let mut parts = value.split('-').map(str::parse::<u32>);
    let (Some(Ok(year)), Some(Ok(month)), Some(Ok(day))) = (parts.next(), parts.next(), parts.next())
    else {
        return None;
    };

    NaiveDate::from_ymd_opt(year as i32, month, day)
}

/// `"present"`, `"PRESENT"` and `" Present "` all become `Present`. Anything else is `None`.
pub fn normalize_status(value: Option<&str>) -> Option<AttendanceStatus> {
    let trimmed = trim_string(value);
    let mut chars = trimmed.chars();
    let first = chars.next()?;

    let normalized: String = first
        .to_uppercase()
        .chain(chars.as_str().to_lowercase().chars())
        .collect();

    normalized.parse().ok()
}

/// Keeps string values and drops everything else, so a number sent for `email`
/// reads the same as no `email` at all.
pub fn string_only<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}
