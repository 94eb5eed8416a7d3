/// Task service
///
/// Enforces task invariants at the service boundary so no caller can bypass
/// them:
///
/// - the title is not empty
/// - a task is created with at least one assignee
///
/// Duplicate assignee IDs are collapsed before anything is written.

use crate::{
    error::TaskError,
    models::task::{status_or_default, NewTask, Task},
    repository::TaskRepository,
};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Task operations
#[derive(Clone)]
pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self { repo }
    }

    /// Creates a task with its assignees and returns its new ID
    ///
    /// The task row and every link are written atomically.
    ///
    /// # Errors
    ///
    /// - `InvalidTitle` when the title is empty, checked first
    /// - `NoAssignees` when no assignee is given
    /// - `UnknownAssignee` when an assignee is not an existing user
    /// - `Database` for any other store failure
    #[instrument(skip(self, input), fields(op = "tasks.create", assignees = input.assignees.len()))]
    pub async fn create(&self, input: NewTask) -> Result<Uuid, TaskError> {
        if input.title.trim().is_empty() {
            return Err(TaskError::InvalidTitle);
        }

        let assignees = dedup(input.assignees);
        if assignees.is_empty() {
            return Err(TaskError::NoAssignees);
        }

        let task = Task {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            status: status_or_default(input.status.as_deref()),
            created_at: Utc::now(),
            assignees,
        };

        self.repo.create(&task).await?;

        info!(task_id = %task.id, "Task created");
        Ok(task.id)
    }

    /// Loads a task with its current assignees
    ///
    /// A task whose links were all removed is returned with an empty list.
    #[instrument(skip(self), fields(op = "tasks.get_by_id"))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Task, TaskError> {
        self.repo.get_by_id(id).await
    }

    /// Deletes a task
    ///
    /// Deleting an ID that does not exist fails with `NotFound`.
    #[instrument(skip(self), fields(op = "tasks.delete"))]
    pub async fn delete(&self, id: Uuid) -> Result<(), TaskError> {
        if !self.repo.delete_by_id(id).await? {
            debug!("No task row deleted");
            return Err(TaskError::NotFound);
        }

        info!("Task deleted");
        Ok(())
    }

    /// Assigns users to an existing task
    ///
    /// Pairs that are already linked are left as they are.
    #[instrument(skip(self, user_ids), fields(op = "tasks.assign", users = user_ids.len()))]
    pub async fn assign(&self, task_id: Uuid, user_ids: Vec<Uuid>) -> Result<(), TaskError> {
        let user_ids = dedup(user_ids);
        if user_ids.is_empty() {
            return Err(TaskError::NoAssignees);
        }

        self.repo.assign(task_id, &user_ids).await?;

        info!("Users assigned");
        Ok(())
    }
}

/// Removes repeated IDs, keeping first-seen order
fn dedup(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
