//! Kill and suicide record extraction.
//!
//! Frag lines look like
//! `<26:32> <Lua> papazark killed lamonthe with AG36` or
//! `<27:18> <Lua> theprophete killed itself`.

use crate::datetime::parse_minute_second;
use crate::error::{Error, Result};
use crate::types::PartialEvent;
use regex::Regex;
use std::sync::OnceLock;

fn frag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"<(\d+):(\d+)> <Lua> (.+) killed (?:itself\s*$|(.+) with (.+))")
            .expect("valid frag regex")
    })
}

fn non_empty(field: Option<regex::Match<'_>>) -> Option<String> {
    field
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse a single line into a frag record, if it is one
pub fn parse_frag_line(line: &str, line_index: usize) -> Result<Option<PartialEvent>> {
    let caps = match frag_pattern().captures(line) {
        Some(caps) => caps,
        None => return Ok(None),
    };

    let (minute, second) = parse_minute_second(&caps[1], &caps[2])?;
    let victim = non_empty(caps.get(4));
    // A weapon without a victim cannot occur in a well-formed line
    let weapon = victim.as_ref().and(non_empty(caps.get(5)));

    Ok(Some(PartialEvent {
        minute,
        second,
        killer: caps[3].trim().to_string(),
        victim,
        weapon,
        line: line_index,
    }))
}

/// Extract every frag record in text order
pub fn extract_events(log_data: &str) -> Result<Vec<PartialEvent>> {
    let mut events = Vec::new();
    for (index, line) in log_data.lines().enumerate() {
        if let Some(event) = parse_frag_line(line, index)? {
            events.push(event);
        }
    }

    if events.is_empty() {
        return Err(Error::NoEventsFound);
    }

    log::debug!(
        "extracted {} frag records ({} suicides)",
        events.len(),
        events.iter().filter(|e| e.is_suicide()).count()
    );
    Ok(events)
}
