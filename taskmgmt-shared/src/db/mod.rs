/// Database layer
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with health check
/// - `migrations`: embedded schema migrations
///
/// Models and their SQL are in the `models` module at crate root level.

pub mod migrations;
pub mod pool;
