use crate::error::{AssertError, Result};
use chrono::NaiveTime;
use regex::Regex;
use std::sync::LazyLock;

static TIME_OF_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^0-9])([0-9]{2}:[0-9]{2}:[0-9]{2})(?:[^0-9]|$)")
        .expect("time-of-day pattern is valid")
});

/// Return the first `HH:MM:SS` substring of a log line.
///
/// The digits must not be part of a longer digit run, so `123:45:67` and
/// `12:34:567` are not accepted.
pub fn extract_time(line: &str) -> Result<&str> {
    TIME_OF_DAY
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| AssertError::NoTimestampFound(line.to_string()))
}

/// Extract and parse the time of day of a log line (24-hour clock, no date).
pub fn parse_time_of_day(line: &str) -> Result<NaiveTime> {
    let raw = extract_time(line)?;
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .map_err(|_| AssertError::NoTimestampFound(line.to_string()))
}
