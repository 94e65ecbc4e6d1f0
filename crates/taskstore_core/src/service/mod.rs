//! Use-case services over repository contracts.

pub mod task_service;
