/// Repository capabilities
///
/// Services depend on these traits, never on a concrete store. Two adapters
/// are provided:
///
/// - `postgres`: parameterized SQL over a `PgPool`
/// - `memory`: an in-process store with the same observable semantics,
///   used by tests
///
/// # Contract
///
/// Implementations translate store-native signals into domain kinds:
/// a missing row becomes `NotFound`, a duplicate email becomes
/// `EmailAlreadyExists`, a link to a missing user becomes `UnknownAssignee`.
/// Any other failure is returned as `Database`.
///
/// Deletes report whether a row was removed and leave the not-found policy
/// to the caller.

pub mod memory;
pub mod postgres;

use crate::{
    error::{TaskError, UserError},
    models::{task::Task, user::User},
};
use async_trait::async_trait;
use uuid::Uuid;

pub use memory::InMemoryStore;
pub use postgres::{PgTaskRepository, PgUserRepository};

/// Persistence of users
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persists a new user
    async fn create(&self, user: &User) -> Result<(), UserError>;

    /// Loads a user, failing with `NotFound` when absent
    async fn get_by_id(&self, id: Uuid) -> Result<User, UserError>;

    /// Removes a user and its assignment links
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, UserError>;
}

/// Persistence of tasks and their assignment links
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Persists the task row and one link per assignee, all or nothing
    async fn create(&self, task: &Task) -> Result<(), TaskError>;

    /// Loads a task with its assignees, failing with `NotFound` when absent
    async fn get_by_id(&self, id: Uuid) -> Result<Task, TaskError>;

    /// Removes a task and its assignment links
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, TaskError>;

    /// Links users to an existing task; already-linked pairs are skipped
    async fn assign(&self, task_id: Uuid, user_ids: &[Uuid]) -> Result<(), TaskError>;
}
