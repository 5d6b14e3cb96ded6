//! Local SQLite store for roadmap state and the offline resource cache.
//!
//! # Responsibility
//! - Resolve where the local store lives (file or memory) and open it.
//! - Bring the schema up to date before any repository touches it.
//!
//! # Invariants
//! - The schema version lives in `PRAGMA user_version`.
//! - A store written by a newer binary is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, open_store};
pub use rusqlite::Connection;

pub type DbResult<T> = Result<T, DbError>;

const DATA_SUBDIR: &str = "roadmap";
const DATABASE_FILE: &str = "roadmap.sqlite";

/// Where the local store is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    /// Private database that disappears with its connection.
    Memory,
}

impl StoreLocation {
    /// File location when a path is configured, memory otherwise.
    pub fn from_optional(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Memory, Self::File)
    }

    /// Configured path first, then the default file under `data_dir`.
    ///
    /// Memory only when neither is known.
    pub fn resolve(configured: Option<PathBuf>, data_dir: Option<PathBuf>) -> Self {
        match (configured, data_dir) {
            (Some(path), _) => Self::File(path),
            (None, Some(dir)) => Self::File(default_database_path(&dir)),
            (None, None) => Self::Memory,
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }
}

/// `<data_dir>/roadmap/roadmap.sqlite`.
pub fn default_database_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DATA_SUBDIR).join(DATABASE_FILE)
}

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    CreateDirectory {
        path: PathBuf,
        source: io::Error,
    },
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::CreateDirectory { path, source } => write!(
                f,
                "failed to create store directory `{}`: {source}",
                path.display()
            ),
            Self::Migration {
                version,
                name,
                source,
            } => write!(f, "migration {version} ({name}) failed: {source}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "local store is at schema {db_version}, this build understands up to {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::CreateDirectory { source, .. } => Some(source),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
