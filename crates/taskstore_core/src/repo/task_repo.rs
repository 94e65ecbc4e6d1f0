//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide save/fetch/update/delete APIs over the `tasks` table.
//! - Keep SQL and record mapping inside the persistence boundary.
//!
//! # Invariants
//! - `save` always inserts; duplicate ids are stored as separate records.
//! - Lookups by id take the first matching record in rowid order.
//! - Update rewrites `title` and `description` only, never `id`.
//! - A failed mutation leaves the table in its pre-call state.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::task::{Task, TaskId};
use crate::repo::record::{to_record, to_value, TaskRecord};
use log::{debug, error, info};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const TASK_SELECT_SQL: &str = "SELECT
    rowid AS row_id,
    id,
    title,
    description
FROM tasks";

const REQUIRED_TASK_COLUMNS: [&str; 3] = ["id", "title", "description"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from task repository operations.
#[derive(Debug)]
pub enum RepoError {
    /// No record carries the requested id.
    NotFound(TaskId),
    /// Underlying read, write or commit failure, passed through unchanged.
    Persistence(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    /// Stable short code used in log events.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Persistence(_) => "persistence",
            Self::UninitializedConnection { .. } => "uninitialized_connection",
            Self::MissingRequiredTable(_) => "missing_table",
            Self::MissingRequiredColumn { .. } => "missing_column",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Persistence(err) => write!(f, "task persistence failed: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "task repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "task repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "task repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
            Self::NotFound(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Persistence(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Persistence(DbError::Sqlite(value))
    }
}

/// Repository interface for task persistence.
pub trait TaskRepository {
    /// Inserts a new record built from `task` and commits.
    fn save(&self, task: &Task) -> RepoResult<()>;
    /// Loads every stored task, in storage order.
    fn fetch_all(&self) -> RepoResult<Vec<Task>>;
    /// Gets the first task stored with `id`.
    fn find_by_id(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Overwrites title and description of the first record with `id`.
    fn update_by_id(&self, id: TaskId, task: &Task) -> RepoResult<()>;
    /// Removes the first record with `id`.
    fn delete_by_id(&self, id: TaskId) -> RepoResult<()>;
    /// Removes every task record in one batch statement.
    fn delete_all(&self) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_task_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn begin(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn save(&self, task: &Task) -> RepoResult<()> {
        let started_at = Instant::now();
        let result = (|| -> RepoResult<()> {
            let mut record = TaskRecord::default();
            to_record(task, &mut record);

            let tx = self.begin()?;
            tx.execute(
                "INSERT INTO tasks (id, title, description) VALUES (?1, ?2, ?3);",
                params![record.id, record.title, record.description],
            )?;
            tx.commit()?;
            Ok(())
        })();
        log_outcome("save", Some(task.id()), started_at, &result);
        result
    }

    fn fetch_all(&self) -> RepoResult<Vec<Task>> {
        let started_at = Instant::now();
        let result = (|| -> RepoResult<Vec<Task>> {
            let mut stmt = self.conn.prepare(&format!("{TASK_SELECT_SQL};"))?;
            let mut rows = stmt.query([])?;
            let mut tasks = Vec::new();
            while let Some(row) = rows.next()? {
                tasks.push(to_value(&TaskRecord::from_row(row)?));
            }
            Ok(tasks)
        })();
        match &result {
            Ok(tasks) => debug!(
                "event=task_read module=repo op=fetch_all status=ok count={} duration_ms={}",
                tasks.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("fetch_all", None, started_at, err),
        }
        result
    }

    fn find_by_id(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let started_at = Instant::now();
        let result =
            find_first(self.conn, id).map(|found| found.map(|(_, record)| to_value(&record)));
        if let Err(err) = &result {
            log_failure("find_by_id", Some(id), started_at, err);
        }
        result
    }

    fn update_by_id(&self, id: TaskId, task: &Task) -> RepoResult<()> {
        let started_at = Instant::now();
        let result = (|| -> RepoResult<()> {
            let tx = self.begin()?;
            let (row_id, mut record) = find_first(&tx, id)?.ok_or(RepoError::NotFound(id))?;

            record.title = task.title().to_string();
            record.description = task.description().to_string();

            tx.execute(
                "UPDATE tasks SET title = ?2, description = ?3 WHERE rowid = ?1;",
                params![row_id, record.title, record.description],
            )?;
            tx.commit()?;
            Ok(())
        })();
        log_outcome("update_by_id", Some(id), started_at, &result);
        result
    }

    fn delete_by_id(&self, id: TaskId) -> RepoResult<()> {
        let started_at = Instant::now();
        let result = (|| -> RepoResult<()> {
            let tx = self.begin()?;
            let (row_id, _) = find_first(&tx, id)?.ok_or(RepoError::NotFound(id))?;
            tx.execute("DELETE FROM tasks WHERE rowid = ?1;", [row_id])?;
            tx.commit()?;
            Ok(())
        })();
        log_outcome("delete_by_id", Some(id), started_at, &result);
        result
    }

    fn delete_all(&self) -> RepoResult<()> {
        let started_at = Instant::now();
        let result = (|| -> RepoResult<usize> {
            let tx = self.begin()?;
            let removed = tx.execute("DELETE FROM tasks;", [])?;
            tx.commit()?;
            Ok(removed)
        })();
        match result {
            Ok(removed) => {
                info!(
                    "event=task_write module=repo op=delete_all status=ok removed={removed} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                log_failure("delete_all", None, started_at, &err);
                Err(err)
            }
        }
    }
}

/// Returns the rowid and record of the first task stored with `id`.
fn find_first(conn: &Connection, id: TaskId) -> RepoResult<Option<(i64, TaskRecord)>> {
    let found = conn
        .query_row(
            &format!("{TASK_SELECT_SQL} WHERE id = ?1 ORDER BY rowid ASC LIMIT 1;"),
            [id],
            |row| Ok((row.get::<_, i64>("row_id")?, TaskRecord::from_row(row)?)),
        )
        .optional()?;
    Ok(found)
}

fn log_outcome(op: &str, id: Option<TaskId>, started_at: Instant, result: &RepoResult<()>) {
    match result {
        Ok(()) => info!(
            "event=task_write module=repo op={op} status=ok task_id={} duration_ms={}",
            format_task_id(id),
            started_at.elapsed().as_millis()
        ),
        Err(err) => log_failure(op, id, started_at, err),
    }
}

fn log_failure(op: &str, id: Option<TaskId>, started_at: Instant, err: &RepoError) {
    error!(
        "event=task_repo module=repo op={op} status=error task_id={} duration_ms={} error_code={} error={}",
        format_task_id(id),
        started_at.elapsed().as_millis(),
        err.error_code(),
        err
    );
}

fn format_task_id(id: Option<TaskId>) -> String {
    id.map_or_else(|| "none".to_string(), |value| value.to_string())
}

fn ensure_task_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "tasks")? {
        return Err(RepoError::MissingRequiredTable("tasks"));
    }

    for column in REQUIRED_TASK_COLUMNS {
        if !table_has_column(conn, "tasks", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "tasks",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
