/// Task endpoints
///
/// # Endpoints
///
/// - `POST /tasks` - Create task with assignees
/// - `GET /tasks/:id` - Get task with assignees
/// - `DELETE /tasks/:id` - Delete task
/// - `POST /tasks/:id/assignees` - Assign more users

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    extract::{parse_id, ApiJson},
    response::{Empty, Envelope},
};
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskmgmt_shared::models::task::{NewTask, Task};
use uuid::Uuid;

/// Create task request
///
/// Missing fields decode to their empty value so that the domain rules
/// (non-empty title, at least one assignee) produce the error.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Defaults to `todo` when absent or blank
    #[serde(default)]
    pub status: Option<String>,

    /// User IDs
    #[serde(default)]
    pub assignees: Vec<String>,
}

/// Assign users request
#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    #[serde(default)]
    pub assignees: Vec<String>,
}

/// Create task response
#[derive(Debug, Serialize)]
pub struct CreateTaskResponse {
    pub id: String,
}

/// Get task response
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: String,
    pub title: String,
    pub description: String,

    /// Renamed so it cannot collide with the envelope discriminator
    #[serde(rename = "task_status")]
    pub status: String,

    pub created_at: DateTime<Utc>,
    pub assignees: Vec<String>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.to_string(),
            title: task.title,
            description: task.description,
            status: task.status,
            created_at: task.created_at,
            assignees: task.assignees.iter().map(Uuid::to_string).collect(),
        }
    }
}

/// Parses every assignee ID, reporting each malformed one by position
fn parse_assignees(raw: &[String]) -> ApiResult<Vec<Uuid>> {
    let mut ids = Vec::with_capacity(raw.len());
    let mut errors = Vec::new();

    for (i, value) in raw.iter().enumerate() {
        match Uuid::parse_str(value.trim()) {
            Ok(id) => ids.push(id),
            Err(_) => errors.push(ValidationErrorDetail {
                field: format!("assignees[{}]", i),
                message: "invalid id".to_string(),
            }),
        }
    }

    if !errors.is_empty() {
        return Err(ApiError::ValidationError(errors));
    }

    Ok(ids)
}

/// Create a task
///
/// # Endpoint
///
/// ```text
/// POST /tasks
/// Content-Type: application/json
///
/// {
///   "title": "Write report",
///   "description": "Q3 numbers",
///   "status": "todo",
///   "assignees": ["uuid"]
/// }
/// ```
///
/// # Response
///
/// ```json
/// { "status": "ok", "id": "uuid" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Body is not valid JSON
/// - `422 Unprocessable Entity`: Empty title, no assignees, unknown assignee
///   or malformed assignee ID
pub async fn create_task(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateTaskRequest>,
) -> ApiResult<Json<Envelope<CreateTaskResponse>>> {
    let assignees = parse_assignees(&req.assignees)?;

    let id = state
        .tasks
        .create(NewTask {
            title: req.title,
            description: req.description,
            status: req.status,
            assignees,
        })
        .await?;

    Ok(Json(Envelope::ok(CreateTaskResponse { id: id.to_string() })))
}

/// Get a task by ID
///
/// # Response
///
/// ```json
/// {
///   "status": "ok",
///   "id": "uuid",
///   "title": "Write report",
///   "description": "Q3 numbers",
///   "task_status": "todo",
///   "created_at": "2025-01-01T00:00:00Z",
///   "assignees": ["uuid"]
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed ID
/// - `404 Not Found`: Task not found
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<TaskResponse>>> {
    let id = parse_id(&id)?;

    let task = state.tasks.get_by_id(id).await?;

    Ok(Json(Envelope::ok(task.into())))
}

/// Delete a task
///
/// # Errors
///
/// - `400 Bad Request`: Malformed ID
/// - `404 Not Found`: Task not found
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Empty>>> {
    let id = parse_id(&id)?;

    state.tasks.delete(id).await?;

    Ok(Json(Envelope::ok_empty()))
}

/// Assign users to an existing task
///
/// Already-assigned users are accepted and left unchanged.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed task ID or body
/// - `404 Not Found`: Task not found
/// - `422 Unprocessable Entity`: No assignees, unknown or malformed assignee
pub async fn assign_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<AssignRequest>,
) -> ApiResult<Json<Envelope<Empty>>> {
    let id = parse_id(&id)?;
    let assignees = parse_assignees(&req.assignees)?;

    state.tasks.assign(id, assignees).await?;

    Ok(Json(Envelope::ok_empty()))
}
