//! Failure cases of the template store.
//!
//! # Invariants
//! - Raw SQLite errors are classified once, at conversion: lock contention
//!   becomes [`DbError::Busy`], everything else stays [`DbError::Sqlite`].

use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// The store file (or in-memory database) could not be opened.
    Open {
        location: String,
        source: rusqlite::Error,
    },
    /// A schema step failed; its transaction was rolled back.
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
    /// The store was written by a newer build.
    SchemaTooNew { found: u32, supported: u32 },
    /// Another connection kept the store locked past the busy timeout.
    Busy(rusqlite::Error),
    Sqlite(rusqlite::Error),
}

impl DbError {
    /// `true` when retrying later may succeed.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy(_))
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { location, source } => {
                write!(f, "cannot open template store at {location}: {source}")
            }
            Self::Migration {
                version,
                name,
                source,
            } => write!(f, "template store migration {version} ({name}) failed: {source}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "template store schema {found} is newer than this build supports ({supported})"
            ),
            Self::Busy(err) => write!(f, "template store is busy: {err}"),
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Migration { source, .. } => Some(source),
            Self::Busy(err) | Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        match value.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => Self::Busy(value),
            _ => Self::Sqlite(value),
        }
    }
}
