//! Task use-case service.
//!
//! # Responsibility
//! - Provide stable task entry points for harness and embedding callers.
//! - Delegate persistence to any `TaskRepository` implementation.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Repository errors are returned unchanged; nothing is retried.

use crate::model::task::{Task, TaskId};
use crate::repo::task_repo::{RepoResult, TaskRepository};
use log::warn;

/// Use-case service wrapper for task CRUD operations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Builds and saves a new task, returning the stored value.
    pub fn create_task(
        &self,
        id: TaskId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> RepoResult<Task> {
        let task = Task::new(id, title, description);
        self.repo.save(&task)?;
        Ok(task)
    }

    pub fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        self.repo.fetch_all()
    }

    pub fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        self.repo.find_by_id(id)
    }

    /// Replaces title and description of the task stored under `id`.
    ///
    /// The id carried by `task` is ignored; the stored id never changes.
    pub fn update_task(&self, id: TaskId, task: &Task) -> RepoResult<()> {
        if task.id() != id {
            warn!(
                "event=task_update module=service status=mismatch task_id={id} payload_id={}",
                task.id()
            );
        }
        self.repo.update_by_id(id, task)
    }

    pub fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        self.repo.delete_by_id(id)
    }

    /// Removes every stored task.
    pub fn clear_tasks(&self) -> RepoResult<()> {
        self.repo.delete_all()
    }
}
