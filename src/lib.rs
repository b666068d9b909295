//! # fraglog - Far Cry Server Log Frag Timeline
//!
//! Rebuilds an absolute, offset-aware timeline of frags from a Far Cry
//! dedicated server log, together with the game session window, mode/map and
//! per-player kill/death streaks.
//!
//! Log lines only carry `<MM:SS>` markers. The hour, date and UTC offset come
//! from the single "Log Started at" line and the `g_timezone` cvar; hour
//! boundaries are inferred from the minute counter going backwards.
//!
//! ## Pipeline
//!
//! - [`anchor`] - start time and UTC offset
//! - [`events`] - kill/suicide records in text order
//! - [`timeline`] - rollover-aware absolute timestamps
//! - [`session`] - session start/end, mode and map
//! - [`streaks`] - longest kill and death runs per player
//!
//! [`parse_log`] runs all of them over one in-memory log. Output, persistence
//! and the CLI live in [`output`], [`storage`] and [`app`].

pub mod anchor;
pub mod app;
pub mod cli;
pub mod datetime;
pub mod error;
pub mod events;
pub mod formatter;
pub mod output;
pub mod session;
pub mod storage;
pub mod streaks;
pub mod timeline;
pub mod types;

pub use error::{Error, Result};
pub use output::{OutputFormat, OutputWriter};
pub use storage::{MatchStore, SqliteStore};
pub use types::{Frag, GameMode, LogAnchor, ParsedLog, PartialEvent, SessionWindow, StreakEntry, StreakRecord};

/// Parse one log held in memory.
///
/// Any failure is terminal for this log. A missing precache marker is not a
/// failure: the frags are kept and `session` is `None`.
pub fn parse_log(log_data: &str) -> Result<ParsedLog> {
    let events = events::extract_events(log_data)?;
    let anchor = anchor::extract_anchor(log_data)?;
    let frags = timeline::reconstruct(&events, &anchor)?;

    let session = match session::resolve_session(log_data, &frags) {
        Ok(window) => Some(window),
        Err(Error::NoSessionData) => {
            log::info!("log has no session markers, keeping {} frags without session", frags.len());
            None
        }
        Err(e) => return Err(e),
    };

    let streaks = streaks::analyze(&frags);

    Ok(ParsedLog {
        anchor,
        frags,
        session,
        streaks,
    })
}
