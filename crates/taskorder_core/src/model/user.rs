//! User domain model.
//!
//! # Responsibility
//! - Define the user record referenced by task ownership.
//! - Enforce the alphanumeric user-name rule on the seeding path.
//!
//! # Invariants
//! - `user_id` is stable and never reused.
//! - `user_name` is unique and contains only ASCII letters and digits.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque identity of a user, as carried by authentication claims.
pub type UserId = Uuid;

static USER_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("valid user name regex"));

/// Account record referenced by task ownership.
///
/// Creation and credential handling belong to the authentication layer;
/// this core only checks existence and reads display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable opaque identifier.
    pub user_id: UserId,
    /// Unique alphanumeric display name.
    pub user_name: String,
}

/// Validation failure for user records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// User name is empty or contains non-alphanumeric characters.
    InvalidUserName(String),
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUserName(name) => {
                write!(f, "user name `{name}` must be non-empty and alphanumeric")
            }
        }
    }
}

impl Error for UserValidationError {}

impl User {
    /// Creates a user with a generated identifier.
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            user_name: user_name.into(),
        }
    }

    /// Validates record-level constraints before persistence.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if USER_NAME_RE.is_match(&self.user_name) {
            Ok(())
        } else {
            Err(UserValidationError::InvalidUserName(self.user_name.clone()))
        }
    }
}
