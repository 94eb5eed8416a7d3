/// User service
///
/// Applies user invariants and delegates to a [`UserRepository`].
/// Email uniqueness is not pre-checked: the store enforces it and the
/// repository reports it as `EmailAlreadyExists`.

use crate::{error::UserError, models::user::User, repository::UserRepository};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;
use validator::ValidateEmail;

/// User operations
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Creates a user and returns its new ID
    ///
    /// # Errors
    ///
    /// - `InvalidEmail` / `InvalidName` when the input breaks an invariant
    /// - `EmailAlreadyExists` when the email is taken
    /// - `Database` for any other store failure
    #[instrument(skip(self, email, name), fields(op = "users.create"))]
    pub async fn create(&self, email: &str, name: &str) -> Result<Uuid, UserError> {
        if email.trim().is_empty() || !email.validate_email() {
            return Err(UserError::InvalidEmail);
        }
        if name.trim().is_empty() {
            return Err(UserError::InvalidName);
        }

        let user = User::new(email, name);
        self.repo.create(&user).await?;

        info!(user_id = %user.id, "User created");
        Ok(user.id)
    }

    #[instrument(skip(self), fields(op = "users.get_by_id"))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<User, UserError> {
        self.repo.get_by_id(id).await
    }

    /// Deletes a user
    ///
    /// Deleting an ID that does not exist fails with `NotFound`.
    #[instrument(skip(self), fields(op = "users.delete"))]
    pub async fn delete(&self, id: Uuid) -> Result<(), UserError> {
        if !self.repo.delete_by_id(id).await? {
            debug!("No user row deleted");
            return Err(UserError::NotFound);
        }

        info!("User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;

    fn service() -> UserService {
        UserService::new(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn test_create_then_get_returns_same_fields() {
        let users = service();

        let id = users.create("a@x.com", "Ann").await.unwrap();
        assert!(!id.is_nil());

        let user = users.get_by_id(id).await.unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.name, "Ann");
    }

    #[tokio::test]
    async fn test_second_create_with_same_email_conflicts() {
        let users = service();

        let first = users.create("a@x.com", "Ann").await.unwrap();
        let err = users.create("a@x.com", "Ann").await.unwrap_err();
        assert!(matches!(err, UserError::EmailAlreadyExists));

        // First user is untouched
        let user = users.get_by_id(first).await.unwrap();
        assert_eq!(user.name, "Ann");
    }

    #[tokio::test]
    async fn test_invalid_input_rejected() {
        let users = service();

        assert!(matches!(
            users.create("", "Ann").await,
            Err(UserError::InvalidEmail)
        ));
        assert!(matches!(
            users.create("not-an-email", "Ann").await,
            Err(UserError::InvalidEmail)
        ));
        assert!(matches!(
            users.create("a@x.com", "  ").await,
            Err(UserError::InvalidName)
        ));
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_not_found() {
        let users = service();
        let err = users.get_by_id(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, UserError::NotFound));
    }

    #[tokio::test]
    async fn test_delete() {
        let users = service();
        let id = users.create("a@x.com", "Ann").await.unwrap();

        users.delete(id).await.unwrap();

        assert!(matches!(users.get_by_id(id).await, Err(UserError::NotFound)));
        assert!(matches!(users.delete(id).await, Err(UserError::NotFound)));
    }

    /// Collects formatted log output in memory
    #[derive(Clone, Default)]
    struct LogCapture(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogCapture {
        type Writer = LogCapture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn test_create_keeps_email_out_of_logs() {
        let capture = LogCapture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        service().create("private@example.com", "Ann").await.unwrap();

        let logs = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("User created"));
        assert!(logs.contains("users.create"));
        assert!(!logs.contains("private@example.com"));
    }
}
