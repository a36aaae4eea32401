use contactdesk_core::db::migrations::latest_version;
use contactdesk_core::db::{open_db, open_db_in_memory, DbError};
use contactdesk_core::{ContactRepository, ContactRequest, ContactService, SqliteContactRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "contacts");
    assert_index_exists(&conn, "idx_contacts_deleted_at");
}

#[test]
fn opening_same_database_twice_is_idempotent_and_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contactdesk.sqlite3");

    let conn_first = open_db(&path).unwrap();
    {
        let service = ContactService::new(SqliteContactRepository::try_new(&conn_first).unwrap());
        service
            .create_contact(&ContactRequest::new("Jane", "jane@example.com", "", ""))
            .unwrap();
    }
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let repo = SqliteContactRepository::try_new(&conn_second).unwrap();
    assert_eq!(repo.find_all().unwrap().len(), 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    assert_eq!(
        sqlite_master_count(conn, "table", table_name),
        1,
        "table {table_name} does not exist"
    );
}

fn assert_index_exists(conn: &Connection, index_name: &str) {
    assert_eq!(
        sqlite_master_count(conn, "index", index_name),
        1,
        "index {index_name} does not exist"
    );
}

fn sqlite_master_count(conn: &Connection, kind: &str, name: &str) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = ?1 AND name = ?2;",
        [kind, name],
        |row| row.get(0),
    )
    .unwrap()
}
