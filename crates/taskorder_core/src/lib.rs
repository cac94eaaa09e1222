//! Task-management core: domain model, access policy, filter engine and
//! lifecycle operations over a SQLite task store.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod policy;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{Task, TaskStatus, TaskValidationError, TaskWithUserName};
pub use model::user::{User, UserId, UserValidationError};
pub use policy::{
    resolve_owner_scope, resolve_user_identity, CallerContext, CallerRole, OwnerScope, PolicyError,
};
pub use repo::task_repo::{SqliteTaskRepository, TaskFilter, TaskRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::task_service::{NewTask, TaskService, TaskServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
