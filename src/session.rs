//! Game session boundary and metadata resolution.

use crate::datetime::{minute_second, parse_minute_second, with_minute_second};
use crate::error::{Error, Result};
use crate::types::{Frag, GameMode, SessionWindow};
use chrono::{DateTime, Duration, FixedOffset};
use regex::Regex;
use std::sync::OnceLock;

fn start_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"Precaching level.*?<(\d+):(\d+)>\s*done").expect("valid precache regex")
    })
}

fn end_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<(\d+):(\d+)> == Statistics").expect("valid statistics regex"))
}

fn leading_marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^<(\d+):(\d+)>").expect("valid marker regex"))
}

fn level_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"Loading level Levels/(\w+), mission (\w+)").expect("valid level regex")
    })
}

fn find_marker(pattern: &Regex, log_data: &str) -> Result<Option<(u32, u32)>> {
    match pattern.captures(log_data) {
        Some(caps) => parse_minute_second(&caps[1], &caps[2]).map(Some),
        None => Ok(None),
    }
}

/// `MM:SS` of the "Precaching level ... done" marker
pub fn find_start_marker(log_data: &str) -> Result<Option<(u32, u32)>> {
    find_marker(start_pattern(), log_data)
}

/// `MM:SS` of the "== Statistics" marker
pub fn find_end_marker(log_data: &str) -> Result<Option<(u32, u32)>> {
    find_marker(end_pattern(), log_data)
}

/// Leading `MM:SS` marker of the line right after the last frag's source line
pub fn time_after_line(log_data: &str, line: usize) -> Result<(u32, u32)> {
    let next = log_data
        .lines()
        .nth(line + 1)
        .ok_or(Error::EndTimeNotFound)?;
    let caps = leading_marker_pattern()
        .captures(next)
        .ok_or(Error::EndTimeNotFound)?;
    parse_minute_second(&caps[1], &caps[2])
}

/// Map name and game mode from the "Loading level" marker
pub fn extract_mode_and_map(log_data: &str) -> Result<(GameMode, String)> {
    let caps = level_pattern()
        .captures(log_data)
        .ok_or_else(|| Error::ModeMapNotFound("no 'Loading level' line".to_string()))?;
    let mode: GameMode = caps[2].parse()?;
    Ok((mode, caps[1].to_string()))
}

/// Place a start marker in the hour of the first frag, or the hour before it
/// when the marker is later within the hour than the frag
fn resolve_start(first: &DateTime<FixedOffset>, marker: (u32, u32)) -> Result<DateTime<FixedOffset>> {
    let base = if marker > minute_second(first) {
        *first - Duration::hours(1)
    } else {
        *first
    };
    with_minute_second(&base, marker.0, marker.1)
}

/// Place an end marker in the hour of the last frag, or the hour after it
/// when the marker is earlier within the hour than the frag
fn resolve_end(last: &DateTime<FixedOffset>, marker: (u32, u32)) -> Result<DateTime<FixedOffset>> {
    let base = if marker < minute_second(last) {
        *last + Duration::hours(1)
    } else {
        *last
    };
    with_minute_second(&base, marker.0, marker.1)
}

/// Resolve the session window for a log whose frags are already reconstructed.
///
/// Fails with `NoSessionData` when the log has no precache marker; the frags
/// stay valid in that case. The end falls back to the line after the last
/// frag when there is no statistics block.
pub fn resolve_session(log_data: &str, frags: &[Frag]) -> Result<SessionWindow> {
    let (first, last) = match (frags.first(), frags.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(Error::NoEventsFound),
    };

    let start_marker = find_start_marker(log_data)?.ok_or(Error::NoSessionData)?;

    let end_marker = match find_end_marker(log_data)? {
        Some(marker) => marker,
        None => {
            log::warn!(
                "no statistics marker, using line after last frag (line {})",
                last.line
            );
            time_after_line(log_data, last.line)?
        }
    };

    let (mode, map) = extract_mode_and_map(log_data)?;
    let start = resolve_start(&first.timestamp, start_marker)?;
    let end = resolve_end(&last.timestamp, end_marker)?;

    log::info!("session {} on {}: {} -> {}", mode, map, start, end);
    Ok(SessionWindow { start, end, mode, map })
}
