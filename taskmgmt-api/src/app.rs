/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskmgmt_api::{app::{build_router, AppState}, config::Config};
/// use taskmgmt_shared::db::pool::create_pool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.pool_config()).await?;
/// let state = AppState::new(pool, config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, routes};
use axum::{
    error_handling::HandleErrorLayer,
    extract::Request,
    routing::{get, post},
    BoxError, Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskmgmt_shared::{
    repository::{PgTaskRepository, PgUserRepository, TaskRepository, UserRepository},
    services::{TaskService, UserService},
};
use tower::{
    timeout::{error::Elapsed, TimeoutLayer},
    ServiceBuilder,
};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
/// Every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// User operations
    pub users: UserService,

    /// Task operations
    pub tasks: TaskService,

    /// Database connection pool, absent when running over in-memory stores
    pub db: Option<PgPool>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates state backed by PostgreSQL
    pub fn new(db: PgPool, config: Config) -> Self {
        let users = Arc::new(PgUserRepository::new(db.clone()));
        let tasks = Arc::new(PgTaskRepository::new(db.clone()));

        Self {
            users: UserService::new(users),
            tasks: TaskService::new(tasks),
            db: Some(db),
            config: Arc::new(config),
        }
    }

    /// Creates state over arbitrary repositories
    pub fn with_repositories(
        users: Arc<dyn UserRepository>,
        tasks: Arc<dyn TaskRepository>,
        config: Config,
    ) -> Self {
        Self {
            users: UserService::new(users),
            tasks: TaskService::new(tasks),
            db: None,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET    /health
/// ├── POST   /users
/// ├── GET    /users/:id
/// ├── DELETE /users/:id
/// ├── POST   /tasks
/// ├── GET    /tasks/:id
/// ├── DELETE /tasks/:id
/// └── POST   /tasks/:id/assignees
/// ```
///
/// # Middleware Stack
///
/// Outermost first:
/// 1. Request ID (`x-request-id`, generated when absent)
/// 2. Logging (tower-http TraceLayer, span carries the request ID)
/// 3. Request ID propagation onto the response
/// 4. Timeout (408 after `HTTP_TIMEOUT_SECS`, rendered as an error envelope)
///
/// Unknown paths and unsupported methods also answer with the error
/// envelope (404 and 405).
pub fn build_router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route(
            "/",
            post(routes::users::create_user).fallback(method_not_allowed),
        )
        .route(
            "/:id",
            get(routes::users::get_user)
                .delete(routes::users::delete_user)
                .fallback(method_not_allowed),
        );

    let task_routes = Router::new()
        .route(
            "/",
            post(routes::tasks::create_task).fallback(method_not_allowed),
        )
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .delete(routes::tasks::delete_task)
                .fallback(method_not_allowed),
        )
        .route(
            "/:id/assignees",
            post(routes::tasks::assign_task).fallback(method_not_allowed),
        );

    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("-");

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                })
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(HandleErrorLayer::new(handle_middleware_error))
        .layer(TimeoutLayer::new(state.config.request_timeout()));

    Router::new()
        .route(
            "/health",
            get(routes::health::health_check).fallback(method_not_allowed),
        )
        .nest("/users", user_routes)
        .nest("/tasks", task_routes)
        .fallback(route_not_found)
        .layer(middleware)
        .with_state(state)
}

async fn route_not_found() -> ApiError {
    ApiError::route_not_found()
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Converts errors raised by the middleware stack into API errors
async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        tracing::warn!("Request timed out");
        ApiError::Timeout
    } else {
        ApiError::InternalError(format!("Unhandled middleware error: {}", err))
    }
}
