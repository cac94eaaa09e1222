//! Task access policy.
//!
//! # Responsibility
//! - Resolve the caller's role and identity claim into an owner scope.
//! - Decide up front whether an operation is permitted at all.
//!
//! # Invariants
//! - An unrecognized role is a hard denial, never an empty result set.
//! - Role resolution happens once at the entry point; downstream code
//!   receives the closed `CallerRole` variant, not a raw role string.

use crate::model::user::UserId;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Caller role as resolved by the authentication boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerRole {
    /// Sees and mutates every task.
    Admin,
    /// Restricted to tasks they own.
    User,
    /// Any role outside the recognized set.
    Other,
}

/// Authenticated request context handed in by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    /// Role resolved once at the entry point.
    pub role: CallerRole,
    /// Raw identity claim, present only when the token carried one.
    pub identity_claim: Option<String>,
}

impl CallerContext {
    /// Context for an admin caller. Admin scope carries no identity.
    pub fn admin() -> Self {
        Self {
            role: CallerRole::Admin,
            identity_claim: None,
        }
    }

    /// Context for a regular user carrying an identity claim.
    pub fn user(user_id: UserId) -> Self {
        Self {
            role: CallerRole::User,
            identity_claim: Some(user_id.to_string()),
        }
    }
}

/// Owner restriction applied to a query on behalf of a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerScope {
    /// No owner restriction; every task qualifies.
    Unrestricted,
    /// Only tasks owned by this user qualify.
    Owner(UserId),
}

impl OwnerScope {
    /// Returns the owner restriction as an optional id.
    pub fn owner(&self) -> Option<UserId> {
        match self {
            Self::Unrestricted => None,
            Self::Owner(id) => Some(*id),
        }
    }
}

/// Policy failure: the caller is denied entirely, not filtered to empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyError {
    /// Role outside the recognized set for this operation.
    AccessDenied,
    /// User-role caller without a present/parseable identity claim.
    IdentityUnresolved,
}

impl Display for PolicyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccessDenied => write!(f, "caller role is not permitted for this operation"),
            Self::IdentityUnresolved => {
                write!(f, "caller identity claim is missing or unparseable")
            }
        }
    }
}

impl Error for PolicyError {}

/// Computes the effective owner restriction for the caller.
///
/// Admin callers see every task; user callers are pinned to their own
/// identity; anything else is denied outright.
pub fn resolve_owner_scope(ctx: &CallerContext) -> Result<OwnerScope, PolicyError> {
    match ctx.role {
        CallerRole::Admin => Ok(OwnerScope::Unrestricted),
        CallerRole::User => Ok(OwnerScope::Owner(resolve_identity_claim(ctx)?)),
        CallerRole::Other => Err(PolicyError::AccessDenied),
    }
}

/// Resolves the identity of a user-role caller for self-scoped mutations.
///
/// Only `CallerRole::User` may act through this path; admin callers use the
/// unrestricted edit operations instead.
pub fn resolve_user_identity(ctx: &CallerContext) -> Result<UserId, PolicyError> {
    match ctx.role {
        CallerRole::User => resolve_identity_claim(ctx),
        CallerRole::Admin | CallerRole::Other => Err(PolicyError::AccessDenied),
    }
}

fn resolve_identity_claim(ctx: &CallerContext) -> Result<UserId, PolicyError> {
    let claim = ctx
        .identity_claim
        .as_deref()
        .ok_or(PolicyError::IdentityUnresolved)?;
    Uuid::parse_str(claim.trim()).map_err(|_| PolicyError::IdentityUnresolved)
}
