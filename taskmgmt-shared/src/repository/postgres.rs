/// PostgreSQL repositories
///
/// Thin adapters over the model SQL. Multi-row writes (task plus links,
/// bulk assignment) run in a single transaction: the transaction is
/// committed on success and rolled back when dropped on any early return,
/// including when the request future itself is dropped.

use super::{TaskRepository, UserRepository};
use crate::{
    error::{TaskError, UserError},
    models::{
        assignment::{self, Assignment},
        task::Task,
        user::User,
    },
};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

/// User repository backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> Result<(), UserError> {
        User::insert(&self.pool, user).await.map_err(|err| {
            if is_unique_violation(&err) {
                UserError::EmailAlreadyExists
            } else {
                UserError::Database(err)
            }
        })
    }

    async fn get_by_id(&self, id: Uuid) -> Result<User, UserError> {
        User::find_by_id(&self.pool, id)
            .await?
            .ok_or(UserError::NotFound)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, UserError> {
        Ok(User::delete(&self.pool, id).await?)
    }
}

/// Task repository backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn create(&self, task: &Task) -> Result<(), TaskError> {
        let mut tx = self.pool.begin().await?;

        Task::insert(&mut *tx, task).await?;

        for &user_id in &task.assignees {
            Assignment::insert(&mut *tx, user_id, task.id)
                .await
                .map_err(|err| link_error(err, user_id))?;
        }

        tx.commit().await?;

        debug!(task_id = %task.id, assignees = task.assignees.len(), "Task row and links committed");
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Task, TaskError> {
        Task::find_by_id(&self.pool, id)
            .await?
            .ok_or(TaskError::NotFound)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, TaskError> {
        Ok(Task::delete(&self.pool, id).await?)
    }

    async fn assign(&self, task_id: Uuid, user_ids: &[Uuid]) -> Result<(), TaskError> {
        let mut tx = self.pool.begin().await?;

        if !Task::exists(&mut *tx, task_id).await? {
            return Err(TaskError::NotFound);
        }

        for &user_id in user_ids {
            Assignment::insert(&mut *tx, user_id, task_id)
                .await
                .map_err(|err| link_error(err, user_id))?;
        }

        tx.commit().await?;
        Ok(())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Name of the foreign key a failed write violated, if that is what failed
fn violated_foreign_key(err: &sqlx::Error) -> Option<Option<&str>> {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            Some(db_err.constraint())
        }
        _ => None,
    }
}

/// Translates a failed link insert
///
/// A violation of the task key means the task was deleted concurrently;
/// any other foreign-key violation points at the user.
fn link_error(err: sqlx::Error, user_id: Uuid) -> TaskError {
    if let Some(constraint) = violated_foreign_key(&err) {
        return link_violation(constraint, user_id);
    }

    TaskError::Database(err)
}

fn link_violation(constraint: Option<&str>, user_id: Uuid) -> TaskError {
    if constraint == Some(assignment::TASK_FKEY) {
        TaskError::NotFound
    } else {
        TaskError::UnknownAssignee(user_id)
    }
}
