//! Response DTOs for the admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::metrics::AggregateMetrics;

/// Response body for `GET /content/:key`
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The cached content
    pub value: Value,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for `PUT /content`
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' cached successfully", key),
            key,
        }
    }
}

/// Response body for `DELETE /cache`, `DELETE /cache/:key` and `DELETE /metrics`
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
    /// The key that was removed, absent when the whole cache was cleared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl ClearResponse {
    pub fn entry(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' cleared", key),
            key: Some(key),
        }
    }

    pub fn all() -> Self {
        Self {
            message: "Cache cleared".to_string(),
            key: None,
        }
    }

    pub fn metrics() -> Self {
        Self {
            message: "Performance samples cleared".to_string(),
            key: None,
        }
    }
}

/// Response body for `GET /metrics`
#[derive(Debug, Clone, Serialize)]
pub struct MetricsResponse {
    /// Window the averages were taken over
    pub window_ms: u64,
    pub metrics: AggregateMetrics,
}

/// Response body for `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
