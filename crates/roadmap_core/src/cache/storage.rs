//! Generation-named response stores over SQLite.

use crate::db::DbError;
use crate::transport::{Response, TransportError};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CacheResult<T> = Result<T, CacheError>;

/// Cache persistence and lifecycle error.
#[derive(Debug)]
pub enum CacheError {
    Db(DbError),
    MissingRequiredTable(&'static str),
    /// Stored headers could not be encoded or decoded.
    Headers(serde_json::Error),
    /// A manifest entry could not be fetched during install.
    Fetch { url: String, source: TransportError },
    /// Activation requested for a generation that was never installed.
    NotInstalled(String),
}

impl Display for CacheError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => write!(f, "required table is missing: {table}"),
            Self::Headers(err) => write!(f, "invalid stored headers: {err}"),
            Self::Fetch { url, source } => write!(f, "failed to fetch `{url}`: {source}"),
            Self::NotInstalled(generation) => {
                write!(f, "cache generation `{generation}` is not installed")
            }
        }
    }
}

impl Error for CacheError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Headers(err) => Some(err),
            Self::Fetch { source, .. } => Some(source),
            Self::MissingRequiredTable(_) | Self::NotInstalled(_) => None,
        }
    }
}

impl From<DbError> for CacheError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for CacheError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(value: serde_json::Error) -> Self {
        Self::Headers(value)
    }
}

/// Named stores of raw responses keyed by request identity.
pub trait CacheStorage: Send + Sync {
    /// Every existing store name, oldest first.
    fn store_names(&self) -> CacheResult<Vec<String>>;
    fn has_store(&self, store: &str) -> CacheResult<bool>;
    fn lookup(&self, store: &str, request_key: &str) -> CacheResult<Option<Response>>;
    /// Stores one response, creating `store` when needed.
    fn put(&self, store: &str, request_key: &str, response: &Response) -> CacheResult<()>;
    /// Creates `store` holding `entries`; all-or-nothing.
    fn put_all(&self, store: &str, entries: &[(String, Response)]) -> CacheResult<()>;
    /// Deletes `store` and its entries; returns whether it existed.
    fn delete_store(&self, store: &str) -> CacheResult<bool>;
}

/// SQLite-backed cache storage.
pub struct SqliteCacheStorage {
    conn: Mutex<Connection>,
}

impl SqliteCacheStorage {
    /// Constructs storage from a migrated connection.
    pub fn try_new(conn: Connection) -> CacheResult<Self> {
        ensure_table(&conn, "cache_stores")?;
        ensure_table(&conn, "cache_entries")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl CacheStorage for SqliteCacheStorage {
    fn store_names(&self) -> CacheResult<Vec<String>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT name FROM cache_stores ORDER BY created_at, name;")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    fn has_store(&self, store: &str) -> CacheResult<bool> {
        let conn = self.conn.lock();
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM cache_stores WHERE name = ?1);",
            [store],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn lookup(&self, store: &str, request_key: &str) -> CacheResult<Option<Response>> {
        let conn = self.conn.lock();
        let row = conn
            .query_row(
                "SELECT status, headers, body
                 FROM cache_entries
                 WHERE store_name = ?1 AND request_key = ?2;",
                params![store, request_key],
                |row| {
                    Ok((
                        row.get::<_, u16>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Vec<u8>>(2)?,
                    ))
                },
            )
            .optional()?;
        let Some((status, headers, body)) = row else {
            return Ok(None);
        };
        Ok(Some(Response {
            status,
            headers: serde_json::from_str(&headers)?,
            body,
        }))
    }

    fn put(&self, store: &str, request_key: &str, response: &Response) -> CacheResult<()> {
        let conn = self.conn.lock();
        ensure_store(&conn, store)?;
        insert_entry(&conn, store, request_key, response)
    }

    fn put_all(&self, store: &str, entries: &[(String, Response)]) -> CacheResult<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        ensure_store(&tx, store)?;
        for (request_key, response) in entries {
            insert_entry(&tx, store, request_key, response)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_store(&self, store: &str) -> CacheResult<bool> {
        let conn = self.conn.lock();
        let changed = conn.execute("DELETE FROM cache_stores WHERE name = ?1;", [store])?;
        Ok(changed > 0)
    }
}

fn ensure_store(conn: &Connection, store: &str) -> CacheResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO cache_stores (name) VALUES (?1);",
        [store],
    )?;
    Ok(())
}

fn insert_entry(
    conn: &Connection,
    store: &str,
    request_key: &str,
    response: &Response,
) -> CacheResult<()> {
    let headers = serde_json::to_string(&response.headers)?;
    conn.execute(
        "INSERT INTO cache_entries (store_name, request_key, status, headers, body)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(store_name, request_key) DO UPDATE SET
            status = excluded.status,
            headers = excluded.headers,
            body = excluded.body,
            stored_at = (strftime('%s', 'now') * 1000);",
        params![store, request_key, response.status, headers, response.body],
    )?;
    Ok(())
}

fn ensure_table(conn: &Connection, table: &'static str) -> CacheResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(CacheError::MissingRequiredTable(table));
    }
    Ok(())
}
