/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>`; domain errors convert into it
/// with `?`.
///
/// | Kind               | Status | `error` message                        |
/// |--------------------|--------|----------------------------------------|
/// | malformed body     | 400    | `invalid request`                      |
/// | bad identifier     | 400    | `invalid id`                           |
/// | field validation   | 422    | `validation failed` + `details`        |
/// | domain invariant   | 422    | e.g. `invalid title`                   |
/// | not found          | 404    | `user not found` / `task not found`    |
/// | unknown route      | 404    | `not found`                            |
/// | wrong method       | 405    | `method not allowed`                   |
/// | slow request       | 408    | `request timeout`                      |
/// | email conflict     | 409    | `email already exists`                 |
/// | anything else      | 500    | `internal error`                       |
///
/// Internal errors are logged with full detail and never exposed.

use crate::response::{ErrorBody, Status};
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use taskmgmt_shared::error::{TaskError, UserError};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400): undecodable body or unparsable identifier
    BadRequest(String),

    /// Unprocessable entity (422): field-level validation errors
    ValidationError(Vec<ValidationErrorDetail>),

    /// Unprocessable entity (422): business invariant violated
    Unprocessable(String),

    /// Not found (404)
    NotFound(String),

    /// Method not allowed (405)
    MethodNotAllowed,

    /// Conflict (409) - duplicate email
    Conflict(String),

    /// Request timeout (408)
    Timeout,

    /// Internal server error (500); the message is only logged
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

impl ApiError {
    pub fn invalid_id() -> Self {
        ApiError::BadRequest("invalid id".to_string())
    }

    /// No route matches the request path
    pub fn route_not_found() -> Self {
        ApiError::NotFound("not found".to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ValidationError(_) | ApiError::Unprocessable(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Unprocessable(msg) => write!(f, "Unprocessable: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::MethodNotAllowed => write!(f, "Method not allowed"),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Timeout => write!(f, "Request timeout"),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (error, details) = match self {
            ApiError::BadRequest(msg)
            | ApiError::Unprocessable(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => (msg, None),
            ApiError::MethodNotAllowed => ("method not allowed".to_string(), None),
            ApiError::Timeout => ("request timeout".to_string(), None),
            ApiError::ValidationError(errors) => ("validation failed".to_string(), Some(errors)),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                ("internal error".to_string(), None)
            }
        };

        let body = Json(ErrorBody {
            status: Status::Error,
            error,
            details,
        });

        (status, body).into_response()
    }
}

/// Malformed or non-JSON request bodies
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Failed to decode request body");
        ApiError::BadRequest("invalid request".to_string())
    }
}

/// Field errors reported by `validator` derives
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut errors: Vec<ValidationErrorDetail> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        errors.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::ValidationError(errors)
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::EmailAlreadyExists => ApiError::Conflict(err.to_string()),
            UserError::NotFound => ApiError::NotFound(err.to_string()),
            UserError::InvalidEmail => ApiError::ValidationError(vec![ValidationErrorDetail {
                field: "email".to_string(),
                message: "invalid email format".to_string(),
            }]),
            UserError::InvalidName => ApiError::ValidationError(vec![ValidationErrorDetail {
                field: "name".to_string(),
                message: "name is required".to_string(),
            }]),
            UserError::Database(db_err) => {
                ApiError::InternalError(format!("Database error: {}", db_err))
            }
        }
    }
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::InvalidTitle | TaskError::NoAssignees | TaskError::UnknownAssignee(_) => {
                ApiError::Unprocessable(err.to_string())
            }
            TaskError::NotFound => ApiError::NotFound(err.to_string()),
            TaskError::Database(db_err) => {
                ApiError::InternalError(format!("Database error: {}", db_err))
            }
        }
    }
}
