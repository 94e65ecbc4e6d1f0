//! Persistent task record and value mapping.
//!
//! # Responsibility
//! - Mirror the `tasks` row shape as a mutable record.
//! - Convert between `Task` values and records in both directions.
//!
//! # Invariants
//! - Mapping is total and side-effect free.
//! - `to_record` is only used for new records; updates assign fields
//!   directly so the stored `id` is never rewritten.

use crate::model::task::{Task, TaskId};
use rusqlite::Row;

/// Mutable, store-owned representation of one task row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskRecord {
    pub id: TaskId,
    pub title: String,
    pub description: String,
}

impl TaskRecord {
    /// Loads record fields from a row selected with `id`, `title` and
    /// `description` columns.
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            description: row.get("description")?,
        })
    }
}

/// Copies every field of `task` onto `record`.
pub fn to_record(task: &Task, record: &mut TaskRecord) {
    record.id = task.id();
    record.title = task.title().to_string();
    record.description = task.description().to_string();
}

/// Builds a task value from the record's current fields.
pub fn to_value(record: &TaskRecord) -> Task {
    Task::new(record.id, record.title.as_str(), record.description.as_str())
}
