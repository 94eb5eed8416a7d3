/// Task model and database operations
///
/// A task is a unit of work with a free-text status and a set of assigned
/// users. The assignee list is not stored on the task row: it is loaded from
/// `user_tasks` every time a task is read.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY,
///     title TEXT NOT NULL CHECK (title <> ''),
///     description TEXT NOT NULL DEFAULT '',
///     status TEXT NOT NULL DEFAULT 'todo',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskmgmt_shared::models::task::Task;
/// use taskmgmt_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// if let Some(task) = Task::find_by_id(&pool, uuid::Uuid::new_v4()).await? {
///     println!("{} has {} assignees", task.title, task.assignees.len());
/// }
/// # Ok(())
/// # }
/// ```

use crate::models::assignment::Assignment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Status given to tasks created without one
pub const DEFAULT_STATUS: &str = "todo";

/// Task with its resolved assignees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task ID, generated on creation
    pub id: Uuid,

    /// Non-empty title
    pub title: String,

    /// Free-text description, may be empty
    pub description: String,

    /// Free-text status
    pub status: String,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// IDs of assigned users
    pub assignees: Vec<Uuid>,
}

/// Row of the `tasks` table
#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: Uuid,
    title: String,
    description: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TaskRow {
    fn with_assignees(self, assignees: Vec<Uuid>) -> Task {
        Task {
            id: self.id,
            title: self.title,
            description: self.description,
            status: self.status,
            created_at: self.created_at,
            assignees,
        }
    }
}

/// Input for creating a task
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    /// `None` or blank falls back to [`DEFAULT_STATUS`]
    pub status: Option<String>,
    pub assignees: Vec<Uuid>,
}

impl Task {
    /// Inserts the task row only
    ///
    /// Assignee links are written separately with [`Assignment::insert`],
    /// normally inside the same transaction.
    pub async fn insert<'e, E>(executor: E, task: &Task) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, title, description, status, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.status)
        .bind(task.created_at)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Finds a task by ID together with its assignees
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, title, description, status, created_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let assignees = Assignment::list_user_ids(pool, id).await?;

        Ok(Some(row.with_assignees(assignees)))
    }

    /// Checks whether a task row exists
    pub async fn exists<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM tasks WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await
    }

    /// Deletes a task
    ///
    /// ⚠️  This also deletes its assignment links due to CASCADE.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Resolves the status a new task is stored with
pub fn status_or_default(status: Option<&str>) -> String {
    match status.map(str::trim) {
        Some(status) if !status.is_empty() => status.to_string(),
        _ => DEFAULT_STATUS.to_string(),
    }
}
