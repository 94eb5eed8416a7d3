/// User model and database operations
///
/// This module provides the User model and the raw SQL used to persist it.
/// Store errors are returned untouched; translation into domain error kinds
/// happens in the repository adapter.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY,
///     email TEXT NOT NULL,
///     name TEXT NOT NULL,
///     CONSTRAINT users_email_key UNIQUE (email)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskmgmt_shared::models::user::User;
/// use taskmgmt_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::new("ann@example.com", "Ann");
/// User::insert(&pool, &user).await?;
///
/// let found = User::find_by_id(&pool, user.id).await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID, generated on creation
    pub id: Uuid,

    /// Email address, unique across all users
    pub email: String,

    /// Display name
    pub name: String,
}

impl User {
    /// Builds a user with a freshly generated ID
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            name: name.into(),
        }
    }

    /// Inserts the user row
    ///
    /// # Errors
    ///
    /// Returns the store error as-is. A duplicate email surfaces as a
    /// unique violation on `users_email_key`.
    pub async fn insert(pool: &PgPool, user: &User) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO users (id, email, name) VALUES ($1, $2, $3)")
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.name)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Deletes a user
    ///
    /// Assignment links of this user are removed by `ON DELETE CASCADE`.
    ///
    /// # Returns
    ///
    /// `true` if a row was deleted, `false` if no user had this ID
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
