//! Key/value repository for local persisted state.
//!
//! # Responsibility
//! - Provide whole-value read/write/delete over the `local_state` table.
//! - Name the well-known keys used by the core.
//!
//! # Invariants
//! - A write replaces the full value for its key (no partial updates).
//! - Missing keys read as `None`, never as an error.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Serialized progress ledger object.
pub const PROGRESS_LEDGER_KEY: &str = "progress_ledger";
/// Last successfully fetched curriculum hierarchy.
pub const CACHED_CURRICULUM_KEY: &str = "cached_curriculum";
/// Selected theme identifier.
pub const SELECTED_THEME_KEY: &str = "selected_theme";
/// Last visited `{month, day}` pair.
pub const LAST_POSITION_KEY: &str = "last_position";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for local state persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    MissingRequiredTable(&'static str),
    InvalidKey(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => write!(f, "required table is missing: {table}"),
            Self::InvalidKey(key) => write!(f, "invalid state key: `{key}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::MissingRequiredTable(_) | Self::InvalidKey(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for one-value-per-key local state.
pub trait StateRepository {
    /// Reads the full value stored under `key`.
    fn get_value(&self, key: &str) -> RepoResult<Option<String>>;
    /// Replaces the full value stored under `key`.
    fn put_value(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Removes `key`; returns whether a value existed.
    fn delete_value(&self, key: &str) -> RepoResult<bool>;
}

impl<T: StateRepository + ?Sized> StateRepository for Rc<T> {
    fn get_value(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).get_value(key)
    }

    fn put_value(&self, key: &str, value: &str) -> RepoResult<()> {
        (**self).put_value(key, value)
    }

    fn delete_value(&self, key: &str) -> RepoResult<bool> {
        (**self).delete_value(key)
    }
}

/// SQLite-backed local state repository.
pub struct SqliteStateRepository {
    conn: Connection,
}

impl SqliteStateRepository {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_state_table(&conn)?;
        Ok(Self { conn })
    }

    /// Returns the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl StateRepository for SqliteStateRepository {
    fn get_value(&self, key: &str) -> RepoResult<Option<String>> {
        let key = normalize_key(key)?;
        let value = self
            .conn
            .query_row(
                "SELECT value FROM local_state WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put_value(&self, key: &str, value: &str) -> RepoResult<()> {
        let key = normalize_key(key)?;
        self.conn.execute(
            "INSERT INTO local_state (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete_value(&self, key: &str) -> RepoResult<bool> {
        let key = normalize_key(key)?;
        let changed = self
            .conn
            .execute("DELETE FROM local_state WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}

fn normalize_key(key: &str) -> RepoResult<&str> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(RepoError::InvalidKey(key.to_string()));
    }
    Ok(trimmed)
}

fn ensure_state_table(conn: &Connection) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = 'local_state'
        );",
        [],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(RepoError::MissingRequiredTable("local_state"));
    }
    Ok(())
}
