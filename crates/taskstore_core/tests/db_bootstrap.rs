use rusqlite::Connection;
use taskstore_core::db::migrations::latest_version;
use taskstore_core::db::{open_db, open_db_in_memory, DbError};
use taskstore_core::{SqliteTaskRepository, Task, TaskRepository};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "tasks");
}

#[test]
fn in_memory_stores_are_isolated() {
    let first = open_db_in_memory().unwrap();
    let second = open_db_in_memory().unwrap();

    SqliteTaskRepository::try_new(&first)
        .unwrap()
        .save(&Task::new(1, "only here", ""))
        .unwrap();

    let other = SqliteTaskRepository::try_new(&second).unwrap();
    assert!(other.fetch_all().unwrap().is_empty());
}

#[test]
fn file_store_persists_tasks_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("tasks.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let repo = SqliteTaskRepository::try_new(&conn).unwrap();
        repo.save(&Task::new(1234, "Core data", "persisted")).unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    assert_eq!(
        repo.fetch_all().unwrap(),
        vec![Task::new(1234, "Core data", "persisted")]
    );
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

#[test]
fn task_serializes_with_plain_field_names() {
    let task = Task::new(5, "title", "desc");
    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "id": 5, "title": "title", "description": "desc" })
    );

    let parsed: Task = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, task);
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
