//! Common test utilities for integration tests
//!
//! The router is driven in-process over in-memory repositories, so no
//! database is needed.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use taskmgmt_api::app::{build_router, AppState};
use taskmgmt_api::config::Config;
use taskmgmt_shared::error::{TaskError, UserError};
use taskmgmt_shared::models::{task::Task, user::User};
use taskmgmt_shared::repository::{InMemoryStore, TaskRepository, UserRepository};
use tower::Service as _;
use uuid::Uuid;

/// Configuration that never touches the process environment
pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgresql://unused/test".to_string()),
        "HTTP_TIMEOUT_SECS" => Some("1".to_string()),
        _ => None,
    })
    .unwrap()
}

/// Router plus the store behind it
pub struct TestContext {
    pub app: axum::Router,
    pub store: InMemoryStore,
}

impl TestContext {
    pub fn new() -> Self {
        let store = InMemoryStore::new();
        let state = AppState::with_repositories(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            test_config(),
        );

        Self {
            app: build_router(state),
            store,
        }
    }

    /// Sends a request with an optional JSON body
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let body = body.map(|b| b.to_string()).unwrap_or_default();
        send_raw(&self.app, method, uri, body).await
    }

    /// Creates a user and returns its ID
    pub async fn create_user(&self, email: &str, name: &str) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/users",
                Some(serde_json::json!({ "email": email, "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create user failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }
}

/// Sends a request with a raw JSON body and decodes the JSON response
pub async fn send_raw(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: String,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = app.clone().call(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

/// Repository whose every call fails with a store error, counting calls
#[derive(Default)]
pub struct BrokenStore {
    pub calls: AtomicUsize,
}

impl BrokenStore {
    fn hit(&self) -> sqlx::Error {
        self.calls.fetch_add(1, Ordering::SeqCst);
        sqlx::Error::PoolTimedOut
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserRepository for BrokenStore {
    async fn create(&self, _user: &User) -> Result<(), UserError> {
        Err(self.hit().into())
    }

    async fn get_by_id(&self, _id: Uuid) -> Result<User, UserError> {
        Err(self.hit().into())
    }

    async fn delete_by_id(&self, _id: Uuid) -> Result<bool, UserError> {
        Err(self.hit().into())
    }
}

#[async_trait]
impl TaskRepository for BrokenStore {
    async fn create(&self, _task: &Task) -> Result<(), TaskError> {
        Err(self.hit().into())
    }

    async fn get_by_id(&self, _id: Uuid) -> Result<Task, TaskError> {
        Err(self.hit().into())
    }

    async fn delete_by_id(&self, _id: Uuid) -> Result<bool, TaskError> {
        Err(self.hit().into())
    }

    async fn assign(&self, _task_id: Uuid, _user_ids: &[Uuid]) -> Result<(), TaskError> {
        Err(self.hit().into())
    }
}

/// Repository that never answers within the request timeout
pub struct SlowStore;

#[async_trait]
impl UserRepository for SlowStore {
    async fn create(&self, _user: &User) -> Result<(), UserError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(())
    }

    async fn get_by_id(&self, _id: Uuid) -> Result<User, UserError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Err(UserError::NotFound)
    }

    async fn delete_by_id(&self, _id: Uuid) -> Result<bool, UserError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(false)
    }
}

/// Router over the given repositories
pub fn router_with(
    users: Arc<dyn UserRepository>,
    tasks: Arc<dyn TaskRepository>,
) -> axum::Router {
    build_router(AppState::with_repositories(users, tasks, test_config()))
}
