/// In-memory repositories
///
/// One `InMemoryStore` implements both [`UserRepository`] and
/// [`TaskRepository`] so it can enforce the same cross-table rules as the
/// SQL schema: unique emails, links only to existing users and tasks, and
/// cascading link removal on delete.
///
/// Clones share the same underlying state.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use taskmgmt_shared::repository::InMemoryStore;
/// use taskmgmt_shared::services::{TaskService, UserService};
///
/// let store = InMemoryStore::new();
/// let users = UserService::new(Arc::new(store.clone()));
/// let tasks = TaskService::new(Arc::new(store));
/// ```

use super::{TaskRepository, UserRepository};
use crate::{
    error::{TaskError, UserError},
    models::{task::Task, user::User},
};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct State {
    users: HashMap<Uuid, User>,
    tasks: HashMap<Uuid, Task>,
    /// (task_id, user_id)
    links: BTreeSet<(Uuid, Uuid)>,
}

impl State {
    fn assignees_of(&self, task_id: Uuid) -> Vec<Uuid> {
        self.links
            .iter()
            .filter(|(task, _)| *task == task_id)
            .map(|(_, user)| *user)
            .collect()
    }

    fn first_unknown_user(&self, user_ids: &[Uuid]) -> Option<Uuid> {
        user_ids
            .iter()
            .copied()
            .find(|id| !self.users.contains_key(id))
    }
}

/// Shared in-process store
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored assignment links
    pub async fn link_count(&self) -> usize {
        self.state.read().await.links.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &User) -> Result<(), UserError> {
        let mut state = self.state.write().await;

        if state.users.values().any(|existing| existing.email == user.email) {
            return Err(UserError::EmailAlreadyExists);
        }

        state.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<User, UserError> {
        self.state
            .read()
            .await
            .users
            .get(&id)
            .cloned()
            .ok_or(UserError::NotFound)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, UserError> {
        let mut state = self.state.write().await;

        let removed = state.users.remove(&id).is_some();
        state.links.retain(|(_, user)| *user != id);

        Ok(removed)
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn create(&self, task: &Task) -> Result<(), TaskError> {
        let mut state = self.state.write().await;

        // Checked up front so a failure leaves nothing behind
        if let Some(unknown) = state.first_unknown_user(&task.assignees) {
            return Err(TaskError::UnknownAssignee(unknown));
        }

        let mut row = task.clone();
        row.assignees.clear();
        state.tasks.insert(task.id, row);

        for &user_id in &task.assignees {
            state.links.insert((task.id, user_id));
        }

        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Task, TaskError> {
        let state = self.state.read().await;

        let mut task = state.tasks.get(&id).cloned().ok_or(TaskError::NotFound)?;
        task.assignees = state.assignees_of(id);

        Ok(task)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, TaskError> {
        let mut state = self.state.write().await;

        let removed = state.tasks.remove(&id).is_some();
        state.links.retain(|(task, _)| *task != id);

        Ok(removed)
    }

    async fn assign(&self, task_id: Uuid, user_ids: &[Uuid]) -> Result<(), TaskError> {
        let mut state = self.state.write().await;

        if !state.tasks.contains_key(&task_id) {
            return Err(TaskError::NotFound);
        }
        if let Some(unknown) = state.first_unknown_user(user_ids) {
            return Err(TaskError::UnknownAssignee(unknown));
        }

        for &user_id in user_ids {
            state.links.insert((task_id, user_id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task_for(assignees: Vec<Uuid>) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: "Ship it".to_string(),
            description: String::new(),
            status: "todo".to_string(),
            created_at: Utc::now(),
            assignees,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = InMemoryStore::new();
        UserRepository::create(&store, &User::new("a@x.com", "Ann")).await.unwrap();

        let err = UserRepository::create(&store, &User::new("a@x.com", "Other"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::EmailAlreadyExists));
    }

    #[tokio::test]
    async fn test_create_with_unknown_assignee_leaves_nothing() {
        let store = InMemoryStore::new();
        let ann = User::new("a@x.com", "Ann");
        UserRepository::create(&store, &ann).await.unwrap();

        let ghost = Uuid::new_v4();
        let task = task_for(vec![ann.id, ghost]);

        let err = TaskRepository::create(&store, &task).await.unwrap_err();
        assert!(matches!(err, TaskError::UnknownAssignee(id) if id == ghost));

        assert!(matches!(
            TaskRepository::get_by_id(&store, task.id).await,
            Err(TaskError::NotFound)
        ));
        assert_eq!(store.link_count().await, 0);
    }

    #[tokio::test]
    async fn test_delete_task_cascades_links() {
        let store = InMemoryStore::new();
        let ann = User::new("a@x.com", "Ann");
        UserRepository::create(&store, &ann).await.unwrap();

        let task = task_for(vec![ann.id]);
        TaskRepository::create(&store, &task).await.unwrap();
        assert_eq!(store.link_count().await, 1);

        assert!(TaskRepository::delete_by_id(&store, task.id).await.unwrap());
        assert_eq!(store.link_count().await, 0);
        assert!(!TaskRepository::delete_by_id(&store, task.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_user_cascades_links() {
        let store = InMemoryStore::new();
        let ann = User::new("a@x.com", "Ann");
        let bob = User::new("b@x.com", "Bob");
        UserRepository::create(&store, &ann).await.unwrap();
        UserRepository::create(&store, &bob).await.unwrap();

        let task = task_for(vec![ann.id, bob.id]);
        TaskRepository::create(&store, &task).await.unwrap();

        UserRepository::delete_by_id(&store, ann.id).await.unwrap();

        let loaded = TaskRepository::get_by_id(&store, task.id).await.unwrap();
        assert_eq!(loaded.assignees, vec![bob.id]);
    }

    #[tokio::test]
    async fn test_assign_is_idempotent() {
        let store = InMemoryStore::new();
        let ann = User::new("a@x.com", "Ann");
        UserRepository::create(&store, &ann).await.unwrap();

        let task = task_for(vec![ann.id]);
        TaskRepository::create(&store, &task).await.unwrap();

        store.assign(task.id, &[ann.id]).await.unwrap();
        store.assign(task.id, &[ann.id]).await.unwrap();

        assert_eq!(store.link_count().await, 1);
    }

    #[tokio::test]
    async fn test_assign_to_missing_task() {
        let store = InMemoryStore::new();
        let err = store.assign(Uuid::new_v4(), &[Uuid::new_v4()]).await.unwrap_err();
        assert!(matches!(err, TaskError::NotFound));
    }
}
