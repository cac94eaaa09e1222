//! User repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the user lookups the task core depends on: existence checks,
//!   single-row reads and the admin listing.
//! - Offer the seeding write used by the external registration layer.
//!
//! # Invariants
//! - Task operations never create users; `add_user` exists for the
//!   registration collaborator and test fixtures only.
//! - User names are validated as alphanumeric before persistence.

use crate::model::user::{User, UserId};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

/// Repository interface for user lookups.
pub trait UserRepository {
    /// Persists one user row. Registration-layer/fixture use only.
    fn add_user(&self, user: &User) -> RepoResult<()>;
    /// Returns whether a user with the given id exists.
    fn user_exists(&self, user_id: UserId) -> RepoResult<bool>;
    /// Gets one user by id.
    fn get_user(&self, user_id: UserId) -> RepoResult<Option<User>>;
    /// Lists every user sorted by name.
    fn list_users(&self) -> RepoResult<Vec<User>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["users"])?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn add_user(&self, user: &User) -> RepoResult<()> {
        user.validate()?;

        self.conn.execute(
            "INSERT INTO users (user_id, user_name) VALUES (?1, ?2);",
            params![user.user_id.to_string(), user.user_name.as_str()],
        )?;

        Ok(())
    }

    fn user_exists(&self, user_id: UserId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE user_id = ?1);",
            [user_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn get_user(&self, user_id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT user_id, user_name FROM users WHERE user_id = ?1;")?;
        let mut rows = stmt.query([user_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }

        Ok(None)
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT user_id, user_name FROM users ORDER BY user_name ASC;")?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }

        Ok(users)
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let id_text: String = row.get("user_id")?;
    let user_id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in users.user_id"))
    })?;

    Ok(User {
        user_id,
        user_name: row.get("user_name")?,
    })
}
