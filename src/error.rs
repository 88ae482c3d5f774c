//! Error types for the content cache
//!
//! Provides unified error handling using thiserror. Producer failures are not
//! represented here: `get_or_compute` hands them back to the caller untouched.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache and its admin surface.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    /// Key not found (or expired) in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Configuration update rejected; the previous configuration is kept
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidConfig(_) | CacheError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the content cache.
pub type Result<T> = std::result::Result<T, CacheError>;
