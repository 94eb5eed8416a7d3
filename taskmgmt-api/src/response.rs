/// Response envelope
///
/// Every body carries a `status` discriminator. Success bodies flatten the
/// payload next to it:
///
/// ```json
/// { "status": "ok", "id": "6f1c..." }
/// ```
///
/// Error bodies are built by [`crate::error::ApiError`]:
///
/// ```json
/// { "status": "error", "error": "email already exists" }
/// ```

use crate::error::ValidationErrorDetail;
use serde::Serialize;

/// Envelope discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

/// Successful response with a flattened payload
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: Status,

    #[serde(flatten)]
    pub body: T,
}

/// Payload of operations that return nothing
#[derive(Debug, Serialize)]
pub struct Empty {}

impl<T: Serialize> Envelope<T> {
    pub fn ok(body: T) -> Self {
        Self {
            status: Status::Ok,
            body,
        }
    }
}

impl Envelope<Empty> {
    pub fn ok_empty() -> Self {
        Self::ok(Empty {})
    }
}

/// Failed response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: Status,

    /// Human-readable message
    pub error: String,

    /// Field-level validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}
