//! Error types for the cache layer
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache layer and the demo service.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A cache key collides with the reserved known-keys index name,
    /// or a construction argument is empty/invalid
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Requested entity could not be resolved (demo surface)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failure surfaced by the underlying key-value store; never retried
    #[error("Store error: {0}")]
    Store(String),

    /// Failure raised by the loader; aborts the whole load call
    #[error("Loader error: {0}")]
    Loader(String),

    /// Operation requires a capability the cache was built without
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CacheError::InvalidKey(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CacheError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            CacheError::Store(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            CacheError::Loader(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            CacheError::Unsupported(msg) => (StatusCode::METHOD_NOT_ALLOWED, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache layer.
pub type Result<T> = std::result::Result<T, CacheError>;
