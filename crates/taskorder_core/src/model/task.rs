//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its status lifecycle.
//! - Define the enriched read projection carrying the owner's user name.
//!
//! # Invariants
//! - `title` is the stable identity of a task and unique across the store.
//! - `owner_id` is nullable in storage but required on the create path.
//! - Due dates are epoch milliseconds; calendar-day semantics live in the
//!   repository query that needs them, not here.

use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lifecycle state of a task.
///
/// No transition ordering is enforced; any status is assignable by an
/// authorized caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created but not started. Default for new tasks.
    #[default]
    Pending,
    /// Work is in progress.
    InProgress,
    /// Completed successfully.
    Completed,
}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique title, acts as the primary key.
    pub title: String,
    /// Free-form description text.
    pub description: String,
    /// Due timestamp in epoch milliseconds.
    pub due_at: i64,
    /// Current lifecycle status.
    pub status: TaskStatus,
    /// Owning user. `None` only transiently before assignment; on the edit
    /// path `None` means "keep the existing owner".
    pub owner_id: Option<UserId>,
}

/// Read-only projection of a task joined with its owner's display name.
///
/// Recomputed on every read; has no independent lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskWithUserName {
    pub title: String,
    pub description: String,
    pub due_at: i64,
    pub status: TaskStatus,
    pub user_name: String,
}

/// Validation failure for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title must not be empty"),
        }
    }
}

impl Error for TaskValidationError {}

impl Task {
    /// Creates a task with default `Pending` status and no owner.
    pub fn new(title: impl Into<String>, description: impl Into<String>, due_at: i64) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            due_at,
            status: TaskStatus::Pending,
            owner_id: None,
        }
    }

    /// Returns a copy assigned to the given owner.
    pub fn with_owner(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Returns a copy carrying the given status.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Validates record-level constraints before persistence.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(())
    }
}
