//! Match and frag persistence.
//!
//! The parser core never touches a database; `MatchStore` is the seam the
//! batch runner writes through. `SqliteStore` is the bundled implementation.

use crate::error::{Error, Result};
use crate::types::{Frag, GameMode, SessionWindow};
use chrono::{DateTime, FixedOffset};
use rusqlite::{params, Connection};
use std::path::Path;

/// Identifier returned for an inserted match
pub type MatchId = i64;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS "match" (
        match_id   INTEGER PRIMARY KEY AUTOINCREMENT,
        start_time TEXT NOT NULL,
        end_time   TEXT NOT NULL,
        game_mode  TEXT NOT NULL,
        map_name   TEXT NOT NULL,
        UNIQUE (start_time, end_time, game_mode, map_name)
    );
    CREATE TABLE IF NOT EXISTS match_frag (
        match_id    INTEGER NOT NULL REFERENCES "match" (match_id),
        frag_time   TEXT NOT NULL,
        killer_name TEXT NOT NULL,
        victim_name TEXT,
        weapon_code TEXT
    );
"#;

/// Match row: `(start, end, mode, map)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub mode: GameMode,
    pub map: String,
}

impl From<&SessionWindow> for MatchRecord {
    fn from(session: &SessionWindow) -> Self {
        Self {
            start: session.start,
            end: session.end,
            mode: session.mode,
            map: session.map.clone(),
        }
    }
}

/// Persistence collaborator for parsed matches
pub trait MatchStore {
    /// Insert a match and return its identifier
    fn insert_match(&mut self, record: &MatchRecord) -> Result<MatchId>;

    /// Bulk insert the frags of a match, returning how many rows were written
    fn insert_frags(&mut self, match_id: MatchId, frags: &[Frag]) -> Result<usize>;
}

/// SQLite-backed match store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a database file and make sure the schema exists
    pub fn open(path: &Path) -> Result<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    /// Private in-memory database
    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Number of stored matches
    pub fn match_count(&self) -> Result<i64> {
        Ok(self.conn.query_row(r#"SELECT COUNT(*) FROM "match""#, [], |row| row.get(0))?)
    }

    /// Stored frags of a match as `(frag_time, killer, victim, weapon)`, in insert order
    pub fn frags_for_match(
        &self,
        match_id: MatchId,
    ) -> Result<Vec<(String, String, Option<String>, Option<String>)>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT frag_time, killer_name, victim_name, weapon_code
             FROM match_frag WHERE match_id = ? ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![match_id], |row| {
            Ok((
                row.get::<_, String>(0)?,         // frag_time
                row.get::<_, String>(1)?,         // killer_name
                row.get::<_, Option<String>>(2)?, // victim_name
                row.get::<_, Option<String>>(3)?, // weapon_code
            ))
        })?;

        let mut frags = Vec::new();
        for row in rows {
            frags.push(row?);
        }
        Ok(frags)
    }
}

impl MatchStore for SqliteStore {
    fn insert_match(&mut self, record: &MatchRecord) -> Result<MatchId> {
        self.conn
            .execute(
                r#"INSERT INTO "match" (start_time, end_time, game_mode, map_name) VALUES (?1, ?2, ?3, ?4)"#,
                params![
                    record.start.to_rfc3339(),
                    record.end.to_rfc3339(),
                    record.mode.as_str(),
                    record.map,
                ],
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(code, _)
                    if code.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    Error::InvalidInput(format!(
                        "match {} on {} starting {} is already stored",
                        record.mode, record.map, record.start
                    ))
                }
                other => Error::Database(other),
            })?;
        Ok(self.conn.last_insert_rowid())
    }

    fn insert_frags(&mut self, match_id: MatchId, frags: &[Frag]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO match_frag (match_id, frag_time, killer_name, victim_name, weapon_code)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for frag in frags {
                stmt.execute(params![
                    match_id,
                    frag.timestamp.to_rfc3339(),
                    frag.killer,
                    frag.victim,
                    frag.weapon,
                ])?;
            }
        }
        tx.commit()?;
        log::debug!("stored {} frags for match {}", frags.len(), match_id);
        Ok(frags.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<FixedOffset> {
        FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2018, 11, 9, 13, minute, 0)
            .unwrap()
    }

    fn record() -> MatchRecord {
        MatchRecord {
            start: at(0),
            end: at(30),
            mode: GameMode::Tdm,
            map: "mp_surf".to_string(),
        }
    }

    fn frags() -> Vec<Frag> {
        vec![
            Frag {
                timestamp: at(5),
                killer: "cyap".to_string(),
                victim: Some("lamonthe".to_string()),
                weapon: Some("AG36".to_string()),
                line: 3,
            },
            Frag {
                timestamp: at(6),
                killer: "lamonthe".to_string(),
                victim: None,
                weapon: None,
                line: 4,
            },
        ]
    }

    #[test]
    fn test_insert_match_returns_id() {
        let mut store = SqliteStore::in_memory().unwrap();
        let first = store.insert_match(&record()).unwrap();
        let mut other = record();
        other.map = "mp_jungle".to_string();
        let second = store.insert_match(&other).unwrap();
        assert_ne!(first, second);
        assert_eq!(store.match_count().unwrap(), 2);
    }

    #[test]
    fn test_duplicate_match_is_rejected() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.insert_match(&record()).unwrap();
        assert!(matches!(store.insert_match(&record()), Err(Error::InvalidInput(_))));
        assert_eq!(store.match_count().unwrap(), 1);
    }

    #[test]
    fn test_insert_frags_stores_nulls_for_suicides() {
        let mut store = SqliteStore::in_memory().unwrap();
        let match_id = store.insert_match(&record()).unwrap();
        assert_eq!(store.insert_frags(match_id, &frags()).unwrap(), 2);

        let stored = store.frags_for_match(match_id).unwrap();
        assert_eq!(
            stored,
            vec![
                (
                    "2018-11-09T13:05:00-05:00".to_string(),
                    "cyap".to_string(),
                    Some("lamonthe".to_string()),
                    Some("AG36".to_string())
                ),
                ("2018-11-09T13:06:00-05:00".to_string(), "lamonthe".to_string(), None, None),
            ]
        );
    }

    #[test]
    fn test_match_record_from_session() {
        let session = SessionWindow {
            start: at(0),
            end: at(30),
            mode: GameMode::Tdm,
            map: "mp_surf".to_string(),
        };
        assert_eq!(MatchRecord::from(&session), record());
    }

    #[test]
    fn test_open_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frags.db");
        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.insert_match(&record()).unwrap();
        }
        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.match_count().unwrap(), 1);
    }
}
