//! Request DTOs for the admin API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;
use serde_json::Value;

/// Maximum accepted key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Default window for `GET /metrics` (five minutes)
pub const DEFAULT_METRICS_WINDOW_MS: u64 = 5 * 60 * 1000;

/// Request body for `PUT /content`
///
/// # Fields
/// - `key`: The content key
/// - `value`: Arbitrary JSON content
/// - `ttl_ms`: Optional TTL in milliseconds (uses the default if absent)
#[derive(Debug, Clone, Deserialize)]
pub struct SetContentRequest {
    pub key: String,
    pub value: Value,
    #[serde(default)]
    pub ttl_ms: Option<u64>,
}

impl SetContentRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} characters",
                MAX_KEY_LENGTH
            ));
        }
        if self.ttl_ms == Some(0) {
            return Some("ttl_ms must be greater than zero".to_string());
        }
        None
    }
}

/// Query string for `GET /metrics`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsQuery {
    pub window_ms: Option<u64>,
}

impl MetricsQuery {
    pub fn window_ms(&self) -> u64 {
        self.window_ms.unwrap_or(DEFAULT_METRICS_WINDOW_MS)
    }
}
