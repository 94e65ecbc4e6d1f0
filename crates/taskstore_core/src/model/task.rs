//! Task value object.
//!
//! # Responsibility
//! - Carry task fields between callers and the repository layer.
//!
//! # Invariants
//! - `id` is assigned by the caller and is the lookup key for update/delete.
//! - Uniqueness of `id` is a caller convention, not enforced by storage.

use serde::{Deserialize, Serialize};

/// Caller-assigned task identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = i32;

/// Immutable task record handed to and returned from the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
}

impl Task {
    /// Creates a task with a caller-provided identifier.
    pub fn new(id: TaskId, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
