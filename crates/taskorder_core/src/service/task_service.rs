//! Task lifecycle service.
//!
//! # Responsibility
//! - Implement create/edit/delete/status-transition with their existence
//!   and ownership preconditions.
//! - Inject the caller's owner scope ahead of every read path.
//!
//! # Invariants
//! - Create verifies the referenced owner exists before persisting.
//! - Unset status on create defaults to `Pending`.
//! - The self-service status transition routes through the edit path and
//!   touches only `status`.
//! - Every mutation is one request-scoped unit of work with one commit.

use crate::model::task::{Task, TaskStatus, TaskWithUserName};
use crate::model::user::UserId;
use crate::policy::{resolve_owner_scope, resolve_user_identity, CallerContext, OwnerScope, PolicyError};
use crate::repo::task_repo::{TaskFilter, TaskRepository};
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Request model for creating a task.
///
/// Status is optional here and only here: an unset status becomes
/// `Pending`. The owner is mandatory at creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    /// Due timestamp in epoch milliseconds.
    pub due_at: i64,
    /// Defaults to `Pending` when unset.
    pub status: Option<TaskStatus>,
    /// Owning user; must exist in the user store.
    pub owner_id: UserId,
}

/// Service error taxonomy reported to the transport layer.
///
/// Every variant except `Repo` reflects a client-correctable condition;
/// unanticipated store failures propagate unchanged inside `Repo`.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Referenced task title does not exist.
    TaskNotFound(String),
    /// Create referenced a user absent from the store.
    OwnerNotFound(UserId),
    /// Title uniqueness violated; the pre-existing task is unmodified.
    DuplicateTitle(String),
    /// Authenticated but not entitled to mutate this specific task.
    Forbidden(String),
    /// Caller role not recognized for this operation.
    AccessDenied,
    /// User-role caller without a parseable identity claim.
    IdentityUnresolved,
    /// Persistence-layer failure passed through unmapped.
    Repo(RepoError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskNotFound(title) => write!(f, "task not found: `{title}`"),
            Self::OwnerNotFound(user_id) => write!(f, "user not found: {user_id}"),
            Self::DuplicateTitle(title) => {
                write!(f, "a task with title `{title}` already exists")
            }
            Self::Forbidden(title) => {
                write!(f, "caller is not entitled to mutate task `{title}`")
            }
            Self::AccessDenied => write!(f, "caller role is not permitted for this operation"),
            Self::IdentityUnresolved => {
                write!(f, "caller identity claim is missing or unparseable")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(title) => Self::TaskNotFound(title),
            RepoError::DuplicateTitle(title) => Self::DuplicateTitle(title),
            other => Self::Repo(other),
        }
    }
}

impl From<PolicyError> for TaskServiceError {
    fn from(value: PolicyError) -> Self {
        match value {
            PolicyError::AccessDenied => Self::AccessDenied,
            PolicyError::IdentityUnresolved => Self::IdentityUnresolved,
        }
    }
}

/// Lifecycle service over task and user repositories.
pub struct TaskService<T: TaskRepository, U: UserRepository> {
    tasks: T,
    users: U,
}

impl<T: TaskRepository, U: UserRepository> TaskService<T, U> {
    /// Creates a service using the provided repository implementations.
    pub fn new(tasks: T, users: U) -> Self {
        Self { tasks, users }
    }

    /// Creates a new task after verifying the owner exists.
    ///
    /// # Contract
    /// - Unset status becomes `Pending`.
    /// - Absent owner fails with `OwnerNotFound`; nothing is persisted.
    /// - A duplicate title fails with `DuplicateTitle`.
    pub fn create_task(&self, new_task: &NewTask) -> Result<Task, TaskServiceError> {
        if !self.users.user_exists(new_task.owner_id)? {
            warn!(
                "event=task_create module=service status=rejected reason=owner_not_found owner={}",
                new_task.owner_id
            );
            return Err(TaskServiceError::OwnerNotFound(new_task.owner_id));
        }

        let task = Task {
            title: new_task.title.clone(),
            description: new_task.description.clone(),
            due_at: new_task.due_at,
            status: new_task.status.unwrap_or_default(),
            owner_id: Some(new_task.owner_id),
        };

        let created = self.tasks.create_task(&task)?;
        info!(
            "event=task_create module=service status=ok title_len={}",
            created.title.len()
        );
        Ok(created)
    }

    /// Edits an existing task looked up by title.
    ///
    /// Description, due date and status are overwritten unconditionally;
    /// the owner only when the input supplies one.
    pub fn edit_task(&self, task: &Task) -> Result<Task, TaskServiceError> {
        let updated = self.tasks.edit_task(task)?;
        info!(
            "event=task_edit module=service status=ok title_len={}",
            updated.title.len()
        );
        Ok(updated)
    }

    /// Deletes a task by title. An absent title is `TaskNotFound`, kept
    /// distinct from store-level delete failures.
    pub fn delete_task(&self, title: &str) -> Result<(), TaskServiceError> {
        if self.tasks.get_task_by_title(title)?.is_none() {
            return Err(TaskServiceError::TaskNotFound(title.to_string()));
        }

        self.tasks.delete_task(title)?;
        info!("event=task_delete module=service status=ok");
        Ok(())
    }

    /// Gets one task by exact title.
    pub fn get_task_by_title(&self, title: &str) -> Result<Option<Task>, TaskServiceError> {
        Ok(self.tasks.get_task_by_title(title)?)
    }

    /// Transitions the status of a task the caller owns.
    ///
    /// The caller must be a user-role principal; the task's owner must equal
    /// the caller's identity. Routed through the edit path so every other
    /// field is carried through unchanged.
    pub fn set_own_task_status(
        &self,
        ctx: &CallerContext,
        title: &str,
        new_status: TaskStatus,
    ) -> Result<Task, TaskServiceError> {
        let caller_id = resolve_user_identity(ctx)?;

        let task = self
            .tasks
            .get_task_by_title(title)?
            .ok_or_else(|| TaskServiceError::TaskNotFound(title.to_string()))?;

        if task.owner_id != Some(caller_id) {
            warn!(
                "event=task_status module=service status=rejected reason=forbidden caller={caller_id}"
            );
            return Err(TaskServiceError::Forbidden(title.to_string()));
        }

        let updated = self.tasks.edit_task(&task.with_status(new_status))?;
        info!("event=task_status module=service status=ok");
        Ok(updated)
    }

    /// Lists tasks visible to the caller: everything for admins, own tasks
    /// for users.
    pub fn list_tasks_for(&self, ctx: &CallerContext) -> Result<Vec<Task>, TaskServiceError> {
        match resolve_owner_scope(ctx)? {
            OwnerScope::Unrestricted => Ok(self.tasks.list_all_tasks()?),
            OwnerScope::Owner(id) => Ok(self.tasks.list_tasks_by_owner(id)?),
        }
    }

    /// Runs the filter engine with the caller's owner scope injected ahead
    /// of the supplied criteria.
    pub fn filter_tasks_for(
        &self,
        ctx: &CallerContext,
        filter: &TaskFilter,
    ) -> Result<Vec<TaskWithUserName>, TaskServiceError> {
        let scope = resolve_owner_scope(ctx)?;
        let effective = match scope {
            OwnerScope::Unrestricted => filter.clone(),
            OwnerScope::Owner(id) => TaskFilter {
                owner: Some(id),
                ..filter.clone()
            },
        };
        Ok(self.tasks.filter_tasks_with_user_names(&effective)?)
    }

    /// Enriched projection of every task with a resolvable owner.
    pub fn list_all_with_user_names(&self) -> Result<Vec<TaskWithUserName>, TaskServiceError> {
        Ok(self.tasks.list_all_with_user_names()?)
    }

    /// Lists tasks carrying exactly the given status.
    pub fn list_tasks_by_status(
        &self,
        status: TaskStatus,
    ) -> Result<Vec<Task>, TaskServiceError> {
        Ok(self.tasks.list_tasks_by_status(status)?)
    }

    /// Lists tasks due on or before the calendar date of `due_at`.
    pub fn list_tasks_by_due_date(&self, due_at: i64) -> Result<Vec<Task>, TaskServiceError> {
        Ok(self.tasks.list_tasks_by_due_date(due_at)?)
    }
}
