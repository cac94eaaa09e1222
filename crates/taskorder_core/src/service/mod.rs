//! Use-case services orchestrating policy, validation and persistence.
//!
//! # Responsibility
//! - Provide stable lifecycle entry points for transport callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Services never bypass repository validation/persistence contracts.
//! - Services remain storage-agnostic; callers pick the repository.

pub mod task_service;
