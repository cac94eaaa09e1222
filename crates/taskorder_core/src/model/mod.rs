//! Domain model for the task-management core.
//!
//! # Responsibility
//! - Define the canonical task/user records used by core business logic.
//! - Keep validation rules next to the data they protect.
//!
//! # Invariants
//! - A `Task` is identified by its unique `title`.
//! - `User` rows are referenced, never created, by task operations.

pub mod task;
pub mod user;
