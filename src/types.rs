//! Core data types for parsed log anchors, frags, sessions and streaks.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Absolute reference point of a log: the "Log Started at" time plus the
/// server's `g_timezone` offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LogAnchor {
    /// Wall-clock start time as written in the log
    pub local_start: NaiveDateTime,
    /// Raw hour offset from UTC, no daylight-saving rules
    pub utc_offset_hours: i32,
}

impl LogAnchor {
    /// Fixed offset for this anchor
    pub fn offset(&self) -> Result<FixedOffset> {
        crate::datetime::fixed_offset_hours(self.utc_offset_hours)
    }

    /// Anchor start as an offset-aware timestamp
    pub fn start_time(&self) -> Result<DateTime<FixedOffset>> {
        let offset = self.offset()?;
        offset
            .from_local_datetime(&self.local_start)
            .single()
            .ok_or_else(|| {
                Error::MalformedTimestamp(format!("cannot place {} at {}", self.local_start, offset))
            })
    }
}

/// Kill or suicide record as found in the text, before the hour is known
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartialEvent {
    /// Minute marker (0-59)
    pub minute: u32,
    /// Second marker (0-59)
    pub second: u32,
    /// Player who fragged (or killed themselves)
    pub killer: String,
    /// Fragged player, absent for suicides
    pub victim: Option<String>,
    /// Weapon code, absent for suicides
    pub weapon: Option<String>,
    /// Zero-based line index in the source text
    pub line: usize,
}

impl PartialEvent {
    pub fn is_suicide(&self) -> bool {
        self.victim.is_none()
    }
}

/// A frag with its absolute timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frag {
    /// Absolute time of the frag in the server's fixed offset
    pub timestamp: DateTime<FixedOffset>,
    pub killer: String,
    pub victim: Option<String>,
    pub weapon: Option<String>,
    /// Zero-based source line the frag was read from
    #[serde(skip)]
    pub line: usize,
}

impl Frag {
    pub fn is_suicide(&self) -> bool {
        self.victim.is_none()
    }
}

/// Game mode from the "Loading level ... mission" marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GameMode {
    Assault,
    Tdm,
    Ffa,
}

impl GameMode {
    /// Mode identifier as written in logs and stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Assault => "ASSAULT",
            GameMode::Tdm => "TDM",
            GameMode::Ffa => "FFA",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ASSAULT" => Ok(GameMode::Assault),
            "TDM" => Ok(GameMode::Tdm),
            "FFA" => Ok(GameMode::Ffa),
            other => Err(Error::ModeMapNotFound(format!("unknown game mode '{}'", other))),
        }
    }
}

/// Resolved start and end of a game session plus its mode and map
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub mode: GameMode,
    pub map: String,
}

impl SessionWindow {
    /// Session length
    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}

/// One step of a streak: when it happened, against whom, with what
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakEntry {
    pub timestamp: DateTime<FixedOffset>,
    /// Victim for kill streaks, killer for death streaks
    pub opponent: String,
    pub weapon: Option<String>,
}

/// Longest uninterrupted kill and death runs per player
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreakRecord {
    /// Longest run of kills without being fragged
    pub killers: BTreeMap<String, Vec<StreakEntry>>,
    /// Longest run of deaths without fragging anyone
    pub victims: BTreeMap<String, Vec<StreakEntry>>,
}

impl StreakRecord {
    /// Player with the longest kill streak, first by name on ties
    pub fn top_killer(&self) -> Option<(&str, usize)> {
        Self::longest(&self.killers)
    }

    /// Player with the longest death streak, first by name on ties
    pub fn top_victim(&self) -> Option<(&str, usize)> {
        Self::longest(&self.victims)
    }

    fn longest(runs: &BTreeMap<String, Vec<StreakEntry>>) -> Option<(&str, usize)> {
        runs.iter()
            .map(|(name, run)| (name.as_str(), run.len()))
            .fold(None, |best, (name, len)| match best {
                Some((_, best_len)) if best_len >= len => best,
                _ => Some((name, len)),
            })
    }
}

/// Everything extracted from one log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedLog {
    pub anchor: LogAnchor,
    pub frags: Vec<Frag>,
    /// Absent when the log has no "Precaching level" marker
    pub session: Option<SessionWindow>,
    pub streaks: StreakRecord,
}
