//! # Task Management Shared Library
//!
//! Domain core of the task management API: models, business rules and
//! persistence, independent of the HTTP transport.
//!
//! ## Module Organization
//!
//! - `models`: Data types and their parameterized SQL
//! - `error`: Domain error kinds
//! - `repository`: Repository traits with PostgreSQL and in-memory adapters
//! - `services`: User and task services enforcing invariants
//! - `db`: Connection pool and migrations

pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
