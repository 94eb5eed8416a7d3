/// Request extractors
///
/// Wrappers around axum extractors whose rejections are rendered through
/// [`ApiError`], so a malformed body or identifier gets the same envelope
/// as every other failure.

use crate::error::{ApiError, ApiResult};
use axum::extract::FromRequest;
use uuid::Uuid;

/// JSON body extractor that rejects with `400 invalid request`
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Parses an identifier taken from the URL path
///
/// Runs before any service call, so a malformed ID never reaches the store.
pub fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::invalid_id())
}
