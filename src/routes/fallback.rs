use axum::response::IntoResponse;

use crate::error::Error;

/// Shared fallback for known paths hit with an unsupported method.
pub async fn method_not_allowed() -> impl IntoResponse {
    Error::MethodNotAllowed
}

pub async fn not_found() -> impl IntoResponse {
    Error::NotFound("Route not found".to_string())
}
