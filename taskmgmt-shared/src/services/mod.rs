/// Domain services
///
/// Services own the business invariants and sit between the HTTP handlers
/// and the repositories. They are polymorphic over the repository traits,
/// so the same code runs against PostgreSQL and the in-memory store.

pub mod task;
pub mod user;

pub use task::TaskService;
pub use user::UserService;
