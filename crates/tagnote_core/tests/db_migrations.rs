use rusqlite::Connection;
use std::thread::sleep;
use std::time::Duration;
use tagnote_core::db::migrations::latest_version;
use tagnote_core::db::{open_db, open_db_in_memory, DbError};
use tagnote_core::{SlotRepository, SqliteSlotRepository};

fn slot_row(conn: &Connection, key: &str) -> Option<(String, i64)> {
    conn.query_row(
        "SELECT value, updated_at FROM slots WHERE key = ?1;",
        [key],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .ok()
}

#[test]
fn fresh_database_is_migrated_with_empty_slot_table() {
    let conn = open_db_in_memory().unwrap();

    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM slots;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 0);
}

#[test]
fn slot_write_upserts_one_row_and_advances_updated_at() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::try_new(&conn).unwrap();

    repo.write_slot("TAGS", "[]").unwrap();
    let (first_value, first_at) = slot_row(&conn, "TAGS").unwrap();
    assert_eq!(first_value, "[]");
    assert!(first_at > 0);

    // updated_at has second granularity.
    sleep(Duration::from_millis(1100));
    repo.write_slot(" TAGS ", r#"[{"id":"t1","label":"work"}]"#)
        .unwrap();
    let (second_value, second_at) = slot_row(&conn, "TAGS").unwrap();
    assert_eq!(second_value, r#"[{"id":"t1","label":"work"}]"#);
    assert!(second_at > first_at);

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM slots;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
    assert_eq!(repo.slot_keys().unwrap(), vec!["TAGS".to_string()]);
}

#[test]
fn reopening_keeps_slot_content_without_rerunning_migrations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tagnote.db");

    {
        let conn = open_db(&path).unwrap();
        let repo = SqliteSlotRepository::try_new(&conn).unwrap();
        repo.write_slot("NOTES", "[]").unwrap();
    }

    let conn = open_db(&path).unwrap();
    let repo = SqliteSlotRepository::try_new(&conn).unwrap();
    assert_eq!(repo.read_slot("NOTES").unwrap().as_deref(), Some("[]"));
    assert_eq!(repo.read_slot("TAGS").unwrap(), None);
}

#[test]
fn newer_schema_is_refused_and_left_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("PRAGMA user_version = 7;").unwrap();
    }

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::SchemaTooNew { found: 7, supported } if supported == latest_version()
    ));

    let conn = Connection::open(&path).unwrap();
    let has_slots: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'slots';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(has_slots, 0);
}
