/// Database models
///
/// Plain data types plus the parameterized SQL that reads and writes them.
///
/// # Models
///
/// - `user`: User accounts
/// - `task`: Tasks with their resolved assignees
/// - `assignment`: User-task links (`user_tasks`)

pub mod assignment;
pub mod task;
pub mod user;
