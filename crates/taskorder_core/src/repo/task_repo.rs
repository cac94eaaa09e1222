//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `tasks` table.
//! - Compose optional filter criteria into a single query.
//! - Produce the user-name enriched projection via inner join.
//!
//! # Invariants
//! - Write paths call `Task::validate()` before SQL mutations.
//! - Title lookups are exact and case-sensitive; a blank title resolves to
//!   absent instead of erroring.
//! - Enriched reads exclude tasks whose owner does not resolve to a user
//!   row. Known consequence: orphaned tasks are invisible in those views.
//! - `list_by_due_date` compares calendar dates; `TaskFilter::due_before`
//!   compares full timestamps. Two deliberately distinct semantics.

use crate::model::task::{Task, TaskStatus, TaskWithUserName};
use crate::model::user::UserId;
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, Row};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    title,
    description,
    due_at,
    status,
    user_id
FROM tasks";

const TASK_JOIN_SELECT_SQL: &str = "SELECT
    tasks.title,
    tasks.description,
    tasks.due_at,
    tasks.status,
    users.user_name
FROM tasks
INNER JOIN users ON users.user_id = tasks.user_id";

/// Optional criteria composed into one task query.
///
/// Every field is independently optional; `None` means "criterion omitted",
/// never "matches nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Restrict to tasks owned by this user.
    pub owner: Option<UserId>,
    /// Case-sensitive substring match on the title.
    pub title_contains: Option<String>,
    /// Inclusive full-timestamp ceiling on the due date, epoch ms.
    pub due_before: Option<i64>,
    /// Exact status match.
    pub status: Option<TaskStatus>,
}

/// Repository interface for task persistence and queries.
pub trait TaskRepository {
    /// Inserts a new task. Title collisions surface as `DuplicateTitle`.
    fn create_task(&self, task: &Task) -> RepoResult<Task>;
    /// Gets one task by exact title. Blank titles resolve to `None`.
    fn get_task_by_title(&self, title: &str) -> RepoResult<Option<Task>>;
    /// Lists every task without restriction.
    fn list_all_tasks(&self) -> RepoResult<Vec<Task>>;
    /// Lists tasks owned by one user.
    fn list_tasks_by_owner(&self, owner: UserId) -> RepoResult<Vec<Task>>;
    /// Lists tasks carrying exactly the given status.
    fn list_tasks_by_status(&self, status: TaskStatus) -> RepoResult<Vec<Task>>;
    /// Lists tasks due on or before the calendar date of `due_at` (epoch
    /// ms); time-of-day is truncated on both sides.
    fn list_tasks_by_due_date(&self, due_at: i64) -> RepoResult<Vec<Task>>;
    /// Overwrites description, due date and status of the task with the
    /// given title; the owner is overwritten only when the input supplies
    /// one. Returns the updated record.
    fn edit_task(&self, task: &Task) -> RepoResult<Task>;
    /// Removes the task with the given title. Absent titles are `NotFound`.
    fn delete_task(&self, title: &str) -> RepoResult<()>;
    /// Composes the filter into one query and enriches results with the
    /// owner's user name.
    fn filter_tasks_with_user_names(
        &self,
        filter: &TaskFilter,
    ) -> RepoResult<Vec<TaskWithUserName>>;
    /// Enriched projection of every task with a resolvable owner.
    fn list_all_with_user_names(&self) -> RepoResult<Vec<TaskWithUserName>>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["tasks", "users"])?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<Task> {
        task.validate()?;

        self.conn
            .execute(
                "INSERT INTO tasks (title, description, due_at, status, user_id)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    task.title.as_str(),
                    task.description.as_str(),
                    task.due_at,
                    status_to_db(task.status),
                    task.owner_id.map(|id| id.to_string()),
                ],
            )
            .map_err(|err| map_title_conflict(err, &task.title))?;

        Ok(task.clone())
    }

    fn get_task_by_title(&self, title: &str) -> RepoResult<Option<Task>> {
        if title.trim().is_empty() {
            return Ok(None);
        }

        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE title = ?1;"))?;
        let mut rows = stmt.query([title])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn list_all_tasks(&self) -> RepoResult<Vec<Task>> {
        self.query_tasks(&format!("{TASK_SELECT_SQL} ORDER BY title ASC;"), Vec::new())
    }

    fn list_tasks_by_owner(&self, owner: UserId) -> RepoResult<Vec<Task>> {
        self.query_tasks(
            &format!("{TASK_SELECT_SQL} WHERE user_id = ? ORDER BY title ASC;"),
            vec![Value::Text(owner.to_string())],
        )
    }

    fn list_tasks_by_status(&self, status: TaskStatus) -> RepoResult<Vec<Task>> {
        self.query_tasks(
            &format!("{TASK_SELECT_SQL} WHERE status = ? ORDER BY title ASC;"),
            vec![Value::Text(status_to_db(status).to_string())],
        )
    }

    fn list_tasks_by_due_date(&self, due_at: i64) -> RepoResult<Vec<Task>> {
        // Calendar-date ceiling: truncate time-of-day on both sides before
        // comparing. Distinct from the full-timestamp `due_before` filter.
        self.query_tasks(
            &format!(
                "{TASK_SELECT_SQL}
                 WHERE date(due_at / 1000, 'unixepoch') <= date(? / 1000, 'unixepoch')
                 ORDER BY title ASC;"
            ),
            vec![Value::Integer(due_at)],
        )
    }

    fn edit_task(&self, task: &Task) -> RepoResult<Task> {
        task.validate()?;

        let existing = self
            .get_task_by_title(&task.title)?
            .ok_or_else(|| RepoError::NotFound(task.title.clone()))?;

        // Partial-update rule: an absent owner keeps the current one.
        let owner_id = task.owner_id.or(existing.owner_id);

        self.conn.execute(
            "UPDATE tasks
             SET
                description = ?2,
                due_at = ?3,
                status = ?4,
                user_id = ?5
             WHERE title = ?1;",
            params![
                task.title.as_str(),
                task.description.as_str(),
                task.due_at,
                status_to_db(task.status),
                owner_id.map(|id| id.to_string()),
            ],
        )?;

        Ok(Task {
            title: task.title.clone(),
            description: task.description.clone(),
            due_at: task.due_at,
            status: task.status,
            owner_id,
        })
    }

    fn delete_task(&self, title: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE title = ?1;", [title])?;

        if changed == 0 {
            return Err(RepoError::NotFound(title.to_string()));
        }

        Ok(())
    }

    fn filter_tasks_with_user_names(
        &self,
        filter: &TaskFilter,
    ) -> RepoResult<Vec<TaskWithUserName>> {
        let mut sql = format!("{TASK_JOIN_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(owner) = filter.owner {
            sql.push_str(" AND tasks.user_id = ?");
            bind_values.push(Value::Text(owner.to_string()));
        }

        if let Some(fragment) = filter.title_contains.as_deref() {
            if !fragment.is_empty() {
                // instr() keeps the match case-sensitive; LIKE would fold
                // ASCII case.
                sql.push_str(" AND instr(tasks.title, ?) > 0");
                bind_values.push(Value::Text(fragment.to_string()));
            }
        }

        if let Some(due_before) = filter.due_before {
            sql.push_str(" AND tasks.due_at <= ?");
            bind_values.push(Value::Integer(due_before));
        }

        if let Some(status) = filter.status {
            sql.push_str(" AND tasks.status = ?");
            bind_values.push(Value::Text(status_to_db(status).to_string()));
        }

        sql.push_str(" ORDER BY tasks.title ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_enriched_row(row)?);
        }

        Ok(tasks)
    }

    fn list_all_with_user_names(&self) -> RepoResult<Vec<TaskWithUserName>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_JOIN_SELECT_SQL} ORDER BY tasks.title ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_enriched_row(row)?);
        }

        Ok(tasks)
    }
}

impl SqliteTaskRepository<'_> {
    fn query_tasks(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }
}

fn map_title_conflict(err: rusqlite::Error, title: &str) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.code == ErrorCode::ConstraintViolation =>
        {
            RepoError::DuplicateTitle(title.to_string())
        }
        _ => RepoError::from(err),
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let status_text: String = row.get("status")?;
    let status = parse_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in tasks.status"))
    })?;

    let owner_id = match row.get::<_, Option<String>>("user_id")? {
        Some(value) => Some(parse_user_id(&value)?),
        None => None,
    };

    Ok(Task {
        title: row.get("title")?,
        description: row.get("description")?,
        due_at: row.get("due_at")?,
        status,
        owner_id,
    })
}

fn parse_enriched_row(row: &Row<'_>) -> RepoResult<TaskWithUserName> {
    let status_text: String = row.get("status")?;
    let status = parse_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in tasks.status"))
    })?;

    Ok(TaskWithUserName {
        title: row.get("title")?,
        description: row.get("description")?,
        due_at: row.get("due_at")?,
        status,
        user_name: row.get("user_name")?,
    })
}

fn parse_user_id(value: &str) -> RepoResult<UserId> {
    Uuid::parse_str(value).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{value}` in tasks.user_id"))
    })
}

fn status_to_db(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "pending",
        TaskStatus::InProgress => "in_progress",
        TaskStatus::Completed => "completed",
    }
}

fn parse_status(value: &str) -> Option<TaskStatus> {
    match value {
        "pending" => Some(TaskStatus::Pending),
        "in_progress" => Some(TaskStatus::InProgress),
        "completed" => Some(TaskStatus::Completed),
        _ => None,
    }
}
