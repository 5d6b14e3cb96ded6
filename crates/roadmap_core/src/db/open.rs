//! Opening the local store.
//!
//! Every connection handed out here has `foreign_keys=ON` (the cache entry
//! cascade depends on it) and a fully migrated schema.

use super::migrations::apply_migrations;
use super::{DbError, DbResult, StoreLocation};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the store at `location` and migrates it.
///
/// Emits one `db_open` start event and one ok/error event with the elapsed
/// time.
pub fn open_store(location: &StoreLocation) -> DbResult<Connection> {
    let mode = location.mode();
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let result = connect(location)
        .and_then(|mut conn| prepare(&mut conn).map(|applied| (conn, applied)));

    let elapsed = started_at.elapsed().as_millis();
    match result {
        Ok((conn, applied)) => {
            info!(
                "event=db_open module=db status=ok mode={mode} migrations_applied={applied} duration_ms={elapsed}"
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={elapsed} error={err}"
            );
            Err(err)
        }
    }
}

pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_store(&StoreLocation::File(path.as_ref().to_path_buf()))
}

/// Each call yields an independent database.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_store(&StoreLocation::Memory)
}

fn connect(location: &StoreLocation) -> DbResult<Connection> {
    match location {
        StoreLocation::File(path) => {
            if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|source| DbError::CreateDirectory {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            Ok(Connection::open(path)?)
        }
        StoreLocation::Memory => Ok(Connection::open_in_memory()?),
    }
}

fn prepare(conn: &mut Connection) -> DbResult<usize> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)
}
