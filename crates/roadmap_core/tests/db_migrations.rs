use roadmap_core::db::migrations::{latest_version, schema_version};
use roadmap_core::db::{default_database_path, open_store, DbError, StoreLocation};
use std::path::PathBuf;
use rusqlite::Connection;

fn table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name;")
        .unwrap();
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    names
}

#[test]
fn memory_store_is_fully_migrated() {
    let conn = open_store(&StoreLocation::Memory).unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_eq!(
        table_names(&conn),
        vec!["cache_entries", "cache_stores", "local_state"]
    );
}

#[test]
fn missing_path_falls_back_to_memory() {
    assert_eq!(StoreLocation::from_optional(None), StoreLocation::Memory);
    assert_eq!(StoreLocation::resolve(None, None), StoreLocation::Memory);
}

#[test]
fn configured_path_wins_over_the_data_directory() {
    let configured = PathBuf::from("/srv/roadmap/state.db");
    assert_eq!(
        StoreLocation::resolve(Some(configured.clone()), Some(PathBuf::from("/home/u/.local"))),
        StoreLocation::File(configured)
    );
    assert_eq!(
        StoreLocation::resolve(None, Some(PathBuf::from("/home/u/.local"))),
        StoreLocation::File(PathBuf::from("/home/u/.local/roadmap/roadmap.sqlite"))
    );
}

#[test]
fn default_location_creates_its_directory() {
    let dir = tempfile::tempdir().unwrap();
    let location = StoreLocation::resolve(None, Some(dir.path().to_path_buf()));

    open_store(&location).unwrap();
    assert!(default_database_path(dir.path()).is_file());
}

#[test]
fn file_store_keeps_local_state_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let location = StoreLocation::from_optional(Some(dir.path().join("roadmap.db")));

    let first = open_store(&location).unwrap();
    first
        .execute(
            "INSERT INTO local_state (key, value) VALUES ('selected_theme', '\"theme-ocean\"');",
            [],
        )
        .unwrap();
    drop(first);

    let second = open_store(&location).unwrap();
    let value: String = second
        .query_row(
            "SELECT value FROM local_state WHERE key = 'selected_theme';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(value, "\"theme-ocean\"");
}

#[test]
fn dropping_a_generation_drops_its_entries() {
    let conn = open_store(&StoreLocation::Memory).unwrap();
    conn.execute_batch(
        "INSERT INTO cache_stores (name) VALUES ('cyber-roadmap-v1');
         INSERT INTO cache_entries (store_name, request_key, status, headers, body)
         VALUES ('cyber-roadmap-v1', 'GET http://localhost:5000/', 200, '[]', x'00');
         DELETE FROM cache_stores WHERE name = 'cyber-roadmap-v1';",
    )
    .unwrap();

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM cache_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);
}

#[test]
fn store_from_a_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    Connection::open(&path)
        .unwrap()
        .execute_batch("PRAGMA user_version = 42;")
        .unwrap();

    let err = open_store(&StoreLocation::File(path)).unwrap_err();
    assert!(matches!(
        err,
        DbError::UnsupportedSchemaVersion {
            db_version: 42,
            ..
        }
    ));
}
