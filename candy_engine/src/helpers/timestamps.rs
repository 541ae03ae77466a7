use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

/// The form every timestamp leaves the service in. Millisecond precision, no offset.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

const NAIVE_FORMATS: [&str; 4] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not an ISO-8601 timestamp")]
pub struct TimestampError(String);

/// Parses an ISO-8601 timestamp into the service's naive clock.
///
/// Both `T` and a space are accepted between date and time. Seconds and fractions are optional. A UTC offset or `Z`
/// suffix is accepted but discarded: the wall-clock reading is kept as written.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, TimestampError> {
    let value = value.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return Ok(t.naive_local());
    }
    if let Some(t) = OFFSET_FORMATS.iter().find_map(|f| DateTime::parse_from_str(value, f).ok()) {
        return Ok(t.naive_local());
    }
    if let Some(t) = NAIVE_FORMATS.iter().find_map(|f| NaiveDateTime::parse_from_str(value, f).ok()) {
        return Ok(t);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| TimestampError(value.to_string()))
}

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}
