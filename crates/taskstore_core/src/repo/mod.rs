//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the task data access contract.
//! - Isolate SQLite query details and record mapping from callers.
//!
//! # Invariants
//! - Every mutating call commits its own transaction before returning.
//! - Repository APIs return semantic errors (`NotFound`) in addition to
//!   storage errors (`Persistence`).

pub mod record;
pub mod task_repo;
