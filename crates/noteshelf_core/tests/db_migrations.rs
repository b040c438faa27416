use noteshelf_core::db::migrations::latest_version;
use noteshelf_core::db::{open_db, open_db_in_memory, open_location, DbError};
use noteshelf_core::{DatabaseLocation, NoteRepository, SqliteNoteRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "notes");
}

#[test]
fn opening_same_database_twice_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("noteshelf.db");

    let conn_first = open_db(&path).unwrap();
    {
        let repo = SqliteNoteRepository::try_new(&conn_first).unwrap();
        repo.save(&mut noteshelf_core::Note::new("kept")).unwrap();
    }
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let repo = SqliteNoteRepository::try_new(&conn_second).unwrap();
    assert_eq!(repo.count_notes().unwrap(), 1);
}

#[test]
fn open_location_follows_parsed_url() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("from_url.db").display());
    let location = DatabaseLocation::parse(&url).unwrap();

    let conn = open_location(&location).unwrap();
    assert_table_exists(&conn, "notes");
    assert!(dir.path().join("from_url.db").exists());

    let memory = open_location(&DatabaseLocation::Memory).unwrap();
    assert_table_exists(&memory, "notes");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
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

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteNoteRepository::try_new(&conn).err().unwrap();
    assert!(matches!(
        err,
        noteshelf_core::RepoError::MissingRequiredTable("notes")
    ));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
