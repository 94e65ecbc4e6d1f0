//! Task domain model.
//!
//! # Responsibility
//! - Define the immutable value object callers construct and receive.
//!
//! # Invariants
//! - Every task is identified by a caller-assigned `TaskId`.
//! - Values are never mutated after construction; updates produce new values.

pub mod task;
