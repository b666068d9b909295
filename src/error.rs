//! Error types and handling for log parsing and export.

use std::fmt;

/// Custom error type for fraglog operations
#[derive(Debug)]
pub enum Error {
    /// I/O related errors
    Io(std::io::Error),
    /// JSON serialization errors
    Json(serde_json::Error),
    /// CSV writing errors
    Csv(csv::Error),
    /// SQLite persistence errors
    Database(rusqlite::Error),
    /// Generic error with message
    Generic(String),
    /// Invalid input format
    InvalidInput(String),
    /// Start time or `g_timezone` offset missing or unparsable
    AnchorNotFound(String),
    /// The log holds no kill or suicide records
    NoEventsFound,
    /// No "Precaching level" marker, so the session window cannot be resolved
    NoSessionData,
    /// Neither a statistics marker nor a timed line after the last frag
    EndTimeNotFound,
    /// "Loading level" marker missing or naming an unknown mode
    ModeMapNotFound(String),
    /// A `<MM:SS>` marker outside 00:00..59:59 or an unrepresentable timestamp
    MalformedTimestamp(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Json(err) => write!(f, "JSON error: {}", err),
            Error::Csv(err) => write!(f, "CSV error: {}", err),
            Error::Database(err) => write!(f, "Database error: {}", err),
            Error::Generic(msg) => write!(f, "{}", msg),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Error::AnchorNotFound(msg) => write!(f, "Log start anchor not found: {}", msg),
            Error::NoEventsFound => write!(f, "No frag events found in log"),
            Error::NoSessionData => write!(f, "Log holds no game session data"),
            Error::EndTimeNotFound => write!(f, "Session end time not found"),
            Error::ModeMapNotFound(msg) => write!(f, "Mode and map not found: {}", msg),
            Error::MalformedTimestamp(msg) => write!(f, "Malformed timestamp: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::Csv(err) => Some(err),
            Error::Database(err) => Some(err),
            _ => None,
        }
    }
}

// Convenient conversion traits
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(err)
    }
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, Error>;
