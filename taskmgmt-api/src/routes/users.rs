/// User endpoints
///
/// # Endpoints
///
/// - `POST /users` - Create user
/// - `GET /users/:id` - Get user
/// - `DELETE /users/:id` - Delete user

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{parse_id, ApiJson},
    response::{Empty, Envelope},
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Email address, unique across users
    #[serde(default)]
    #[validate(email(message = "invalid email format"))]
    pub email: String,

    /// Display name
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
}

/// Create user response
#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub id: String,
}

/// Get user response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Create a user
///
/// # Endpoint
///
/// ```text
/// POST /users
/// Content-Type: application/json
///
/// { "email": "a@x.com", "name": "Ann" }
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
/// - `409 Conflict`: Email already exists
/// - `422 Unprocessable Entity`: Validation failed
/// - `500 Internal Server Error`: Server error
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> ApiResult<Json<Envelope<CreateUserResponse>>> {
    req.validate()?;

    let id = state.users.create(&req.email, &req.name).await?;

    Ok(Json(Envelope::ok(CreateUserResponse { id: id.to_string() })))
}

/// Get a user by ID
///
/// # Response
///
/// ```json
/// { "status": "ok", "id": "uuid", "email": "a@x.com", "name": "Ann" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed ID
/// - `404 Not Found`: User not found
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<UserResponse>>> {
    let id = parse_id(&id)?;

    let user = state.users.get_by_id(id).await?;

    Ok(Json(Envelope::ok(UserResponse {
        id: user.id.to_string(),
        email: user.email,
        name: user.name,
    })))
}

/// Delete a user
///
/// The user's task assignments are removed with it.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed ID
/// - `404 Not Found`: User not found
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Empty>>> {
    let id = parse_id(&id)?;

    state.users.delete(id).await?;

    Ok(Json(Envelope::ok_empty()))
}
