use offerdoc_core::db::migrations::{latest_version, schema_version};
use offerdoc_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "templates");
    assert_table_exists(&conn, "template_variants");
    assert_table_exists(&conn, "template_variants_fts");
}

#[test]
fn reopening_a_store_file_keeps_its_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("templates.sqlite3");

    let first = open_db(&path).unwrap();
    assert_eq!(schema_version(&first).unwrap(), latest_version());
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second).unwrap(), latest_version());
    assert_table_exists(&second, "template_variants");
}

#[test]
fn store_written_by_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 42;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 42);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn failed_migration_names_its_step_and_leaves_the_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clash.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("CREATE VIEW templates AS SELECT 1 AS uuid;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::Migration { version, name, .. } => {
            assert_eq!(version, 1);
            assert_eq!(name, "init");
        }
        other => panic!("unexpected error: {other}"),
    }

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), 0);
}

#[test]
fn unopenable_path_reports_its_location() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("templates.sqlite3");

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::Open { .. }));
    assert!(err.to_string().contains("missing"));
}

#[test]
fn variants_cascade_with_their_template_row() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO templates (uuid, name, kind) VALUES ('t-1', 'Offer', 'offer');",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO template_variants (template_uuid, language, content_text)
         VALUES ('t-1', 'en', 'hello');",
        [],
    )
    .unwrap();

    conn.execute("DELETE FROM templates WHERE uuid = 't-1';", [])
        .unwrap();
    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM template_variants;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
