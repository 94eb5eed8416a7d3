/// Domain error kinds
///
/// Repositories translate store-native signals (no rows, unique violation,
/// foreign-key violation) into these kinds. Every other store failure is
/// carried opaquely in the `Database` variant.
///
/// Services raise the invariant kinds (`InvalidTitle`, `NoAssignees`,
/// `InvalidEmail`, `InvalidName`) before touching a repository.

use uuid::Uuid;

/// Failures of user operations
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Another user already owns this email address
    #[error("email already exists")]
    EmailAlreadyExists,

    /// No user with the requested ID
    #[error("user not found")]
    NotFound,

    /// Email is empty or not shaped like an address
    #[error("invalid email")]
    InvalidEmail,

    /// Name is empty
    #[error("invalid name")]
    InvalidName,

    /// Unclassified store failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Failures of task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// Title is empty
    #[error("invalid title")]
    InvalidTitle,

    /// No assignees were given
    #[error("task must have at least one assignee")]
    NoAssignees,

    /// An assignee does not reference an existing user
    #[error("assignee not found: {0}")]
    UnknownAssignee(Uuid),

    /// No task with the requested ID
    #[error("task not found")]
    NotFound,

    /// Unclassified store failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
