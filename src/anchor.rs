//! Log start anchor extraction.
//!
//! Every Far Cry server log opens with a line such as
//! `Log Started at Friday, November 09, 2018 12:22:07` and, somewhere in the
//! cvar dump, a `(g_timezone,-5)` token. Together they are the only absolute
//! time reference in the file.

use crate::datetime::{fixed_offset_hours, parse_log_start};
use crate::error::{Error, Result};
use crate::types::LogAnchor;
use regex::Regex;
use std::sync::OnceLock;

fn start_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"Log Started at (.+)").expect("valid start regex"))
}

fn timezone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\(g_timezone,\s*([+-]?\d+)\s*\)").expect("valid timezone regex"))
}

/// Extract the server's UTC offset in hours from the `g_timezone` cvar
pub fn extract_utc_offset(log_data: &str) -> Result<i32> {
    let caps = timezone_pattern()
        .captures(log_data)
        .ok_or_else(|| Error::AnchorNotFound("no g_timezone entry".to_string()))?;
    let hours: i32 = caps[1]
        .parse()
        .map_err(|_| Error::AnchorNotFound(format!("invalid g_timezone value '{}'", &caps[1])))?;
    // Reject offsets chrono cannot represent
    fixed_offset_hours(hours)?;
    Ok(hours)
}

/// Extract the log start anchor (start time plus UTC offset)
pub fn extract_anchor(log_data: &str) -> Result<LogAnchor> {
    let caps = start_pattern()
        .captures(log_data)
        .ok_or_else(|| Error::AnchorNotFound("no 'Log Started at' line".to_string()))?;
    let local_start = parse_log_start(&caps[1])?;
    let utc_offset_hours = extract_utc_offset(log_data)?;

    log::debug!("log anchor: {} (UTC{:+})", local_start, utc_offset_hours);
    Ok(LogAnchor {
        local_start,
        utc_offset_hours,
    })
}
