//! Display helpers for dates, times and temperatures.
//!
//! Forecast dates are calendar dates in the location's own time, so a
//! `"YYYY-MM-DD"` key is always read as a local calendar day and never as a UTC
//! midnight instant (which would show the previous day west of Greenwich).

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};

use crate::error::WeatherError;

/// Temperature rounded to a whole degree with a Celsius suffix.
///
/// Halves round away from zero, and negative zero prints as `0°C`.
pub fn format_temp(value: f64) -> String {
    format!("{}°C", value.round() as i64)
}

/// Long date for headings, e.g. "Monday, Jan 15".
pub fn format_date(date: &str) -> Result<String, WeatherError> {
    let date = parse_local_date(date)?;
    Ok(date.format("%A, %b %-d").to_string())
}

/// Short date for day cards, e.g. "Jan 15".
pub fn format_short_date(date: &str) -> Result<String, WeatherError> {
    let date = parse_local_date(date)?;
    Ok(date.format("%b %-d").to_string())
}

/// 12-hour clock time of a forecast timestamp, e.g. "09:00 AM".
pub fn format_time(date_time: &str) -> Result<String, WeatherError> {
    let parsed = parse_local_date_time(date_time)?;
    Ok(parsed.format("%I:%M %p").to_string())
}

/// "Today", "Tomorrow" or the weekday name, relative to the local date.
pub fn get_day_name(date: &str) -> Result<String, WeatherError> {
    day_name(date, Local::now().date_naive())
}

/// "Today", "Tomorrow" or the weekday name, relative to `today`.
pub fn day_name(date: &str, today: NaiveDate) -> Result<String, WeatherError> {
    let date = parse_local_date(date)?;

    if date == today {
        Ok("Today".to_string())
    } else if today.succ_opt() == Some(date) {
        Ok("Tomorrow".to_string())
    } else {
        Ok(weekday_name(date).to_string())
    }
}

/// Parse a date key as a local calendar date.
///
/// Exact `YYYY-MM-DD` input is split into its components; anything else goes
/// through the looser date/time parsers.
pub fn parse_local_date(date: &str) -> Result<NaiveDate, WeatherError> {
    if let Some((year, month, day)) = split_date_key(date) {
        return NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| WeatherError::Parse(format!("Invalid calendar date: {}", date)));
    }

    if let Ok(date_time) = parse_local_date_time(date) {
        return Ok(date_time.date());
    }

    ["%Y-%m-%d", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date.trim(), fmt).ok())
        .ok_or_else(|| WeatherError::Parse(format!("Unrecognized date: {}", date)))
}

/// Parse a forecast timestamp as local wall-clock time.
///
/// `"YYYY-MM-DD HH:MM:SS"` has its space turned into `T` first. Timestamps
/// with an explicit offset are converted into the local zone.
pub fn parse_local_date_time(date_time: &str) -> Result<NaiveDateTime, WeatherError> {
    let trimmed = date_time.trim();
    let normalized = if trimmed.contains(' ') && !trimmed.contains('T') {
        trimmed.replacen(' ', "T", 1)
    } else {
        trimmed.to_string()
    };

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(with_offset.with_timezone(&Local).naive_local());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&normalized, fmt).ok())
        .ok_or_else(|| WeatherError::Parse(format!("Unrecognized date/time: {}", date_time)))
}

/// Components of a strict `YYYY-MM-DD` key.
fn split_date_key(date: &str) -> Option<(i32, u32, u32)> {
    let bytes = date.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return None;
    }

    let year = date.get(0..4)?.parse().ok()?;
    let month = date.get(5..7)?.parse().ok()?;
    let day = date.get(8..10)?.parse().ok()?;
    Some((year, month, day))
}

/// Weekday names in display order starting Monday.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Long weekday name of a date.
pub fn weekday_name(date: NaiveDate) -> &'static str {
    WEEKDAY_NAMES[date.weekday().num_days_from_monday() as usize]
}
