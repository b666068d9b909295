//! Date and time handling utilities: fixed offsets, log start parsing and
//! `<MM:SS>` marker arithmetic.

use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Timelike};

/// Format of the "Log Started at" line, e.g. "Friday, November 09, 2018 12:22:07"
pub const LOG_START_FORMAT: &str = "%A, %B %d, %Y %H:%M:%S";

/// Build a fixed offset from a whole number of hours
pub fn fixed_offset_hours(hours: i32) -> Result<FixedOffset> {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| Error::AnchorNotFound(format!("UTC offset {} hours out of range", hours)))
}

/// Parse the timestamp that follows "Log Started at"
pub fn parse_log_start(time_str: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(time_str.trim(), LOG_START_FORMAT).map_err(|e| {
        Error::AnchorNotFound(format!("invalid start time '{}': {}", time_str.trim(), e))
    })
}

/// Parse the two halves of a `<MM:SS>` marker
pub fn parse_minute_second(minute: &str, second: &str) -> Result<(u32, u32)> {
    let malformed = || Error::MalformedTimestamp(format!("{}:{}", minute, second));
    let minute: u32 = minute.parse().map_err(|_| malformed())?;
    let second: u32 = second.parse().map_err(|_| malformed())?;
    if minute > 59 || second > 59 {
        return Err(malformed());
    }
    Ok((minute, second))
}

/// Replace the minute and second of `dt`, keeping hour, date and offset
pub fn with_minute_second(
    dt: &DateTime<FixedOffset>,
    minute: u32,
    second: u32,
) -> Result<DateTime<FixedOffset>> {
    dt.with_minute(minute)
        .and_then(|t| t.with_second(second))
        .ok_or_else(|| {
            Error::MalformedTimestamp(format!("cannot set {:02}:{:02} on {}", minute, second, dt))
        })
}

/// Position of a timestamp inside its hour, for "earlier/later within the hour" checks
pub fn minute_second(dt: &DateTime<FixedOffset>) -> (u32, u32) {
    (dt.minute(), dt.second())
}

/// Format a frag timestamp as "2018-11-09 13:00:09-05:00"
pub fn format_frag_timestamp<T: TimeZone>(dt: &DateTime<T>) -> String
where
    T::Offset: std::fmt::Display,
{
    dt.format("%Y-%m-%d %H:%M:%S%:z").to_string()
}

/// Format the UTC offset of a timestamp ("UTC", "UTC+8", "UTC-5", "UTC+5:30")
pub fn format_utc_offset<T: TimeZone>(dt: &DateTime<T>) -> String {
    let offset_seconds = dt.offset().fix().local_minus_utc();
    let offset_hours = offset_seconds / 3600;
    let offset_minutes = (offset_seconds.abs() % 3600) / 60;

    if offset_minutes == 0 {
        if offset_hours == 0 {
            "UTC".to_string()
        } else if offset_hours > 0 {
            format!("UTC+{}", offset_hours)
        } else {
            format!("UTC{}", offset_hours)
        }
    } else if offset_seconds >= 0 {
        format!("UTC+{}:{:02}", offset_hours, offset_minutes)
    } else {
        // offset_hours is 0 for offsets between -1h and 0, keep the sign
        format!("UTC-{}:{:02}", offset_hours.abs(), offset_minutes)
    }
}
