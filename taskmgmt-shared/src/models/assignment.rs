/// User-task assignment links
///
/// An assignment says "user X is assigned to task Y". The pair is the whole
/// identity; there is no payload. Inserting a pair that already exists is a
/// no-op.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE user_tasks (
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     PRIMARY KEY (user_id, task_id)
/// );
/// ```
///
/// PostgreSQL names the two foreign keys `user_tasks_<column>_fkey`.

use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Foreign key from a link to its user
pub const USER_FKEY: &str = "user_tasks_user_id_fkey";

/// Foreign key from a link to its task
pub const TASK_FKEY: &str = "user_tasks_task_id_fkey";

/// Link between a user and a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::FromRow)]
pub struct Assignment {
    /// Assigned user
    pub user_id: Uuid,

    /// Task the user is assigned to
    pub task_id: Uuid,
}

impl Assignment {
    /// Inserts the link if it does not exist yet
    ///
    /// Accepts any executor so it can run inside the task-creation
    /// transaction.
    ///
    /// # Errors
    ///
    /// A foreign-key violation means the user or the task does not exist.
    pub async fn insert<'e, E>(executor: E, user_id: Uuid, task_id: Uuid) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            r#"
            INSERT INTO user_tasks (user_id, task_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(task_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Lists the IDs of users assigned to a task
    pub async fn list_user_ids<'e, E>(executor: E, task_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT user_id FROM user_tasks WHERE task_id = $1 ORDER BY user_id")
            .bind(task_id)
            .fetch_all(executor)
            .await
    }
}
