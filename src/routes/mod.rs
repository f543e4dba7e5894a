use axum::Json;
use tracing::debug;

use crate::{
    error::ApiError,
    response::{ApiJson, Empty, Envelope},
};

pub async fn health() -> ApiJson<Empty> {
    Json(Envelope::ok(Empty {}))
}

/// Router-level fallback for paths outside the table.
pub async fn not_found(uri: axum::http::Uri) -> ApiError {
    debug!(%uri, "no route");
    ApiError::NotFound("Endpoint not found")
}

/// Known path, unsupported method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
