//! Configuration Module
//!
//! Handles loading cache configuration from environment variables and applying
//! validated partial updates at runtime.

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Cache and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default TTL in milliseconds for entries without explicit TTL
    pub default_ttl_ms: u64,
    /// Maximum aggregate estimated size of all cached entries
    pub max_bytes: u64,
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Number of performance samples retained
    pub ring_buffer_size: usize,
    /// Whether performance samples are recorded at all
    pub metrics_enabled: bool,
    /// Whether `optimize_content` prunes null fields
    pub compression_enabled: bool,
    /// Delay before low-priority preload sections start
    pub preload_delay_ms: u64,
    /// Miss loads slower than this are logged
    pub slow_load_threshold_ms: u64,
    /// HTTP server port for the admin surface
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 900000)
    /// - `CACHE_MAX_BYTES` - Byte budget (default: 5 MiB)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `METRICS_RING_SIZE` - Retained samples (default: 100)
    /// - `METRICS_ENABLED` - Record samples (default: true)
    /// - `CACHE_COMPRESSION` - Null-field pruning (default: true)
    /// - `PRELOAD_DELAY_MS` - Low-priority preload delay (default: 100)
    /// - `SLOW_LOAD_THRESHOLD_MS` - Slow load log threshold (default: 10)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_ttl_ms: env_or("CACHE_DEFAULT_TTL_MS", defaults.default_ttl_ms),
            max_bytes: env_or("CACHE_MAX_BYTES", defaults.max_bytes),
            max_entries: env_or("CACHE_MAX_ENTRIES", defaults.max_entries),
            ring_buffer_size: env_or("METRICS_RING_SIZE", defaults.ring_buffer_size),
            metrics_enabled: env_or("METRICS_ENABLED", defaults.metrics_enabled),
            compression_enabled: env_or("CACHE_COMPRESSION", defaults.compression_enabled),
            preload_delay_ms: env_or("PRELOAD_DELAY_MS", defaults.preload_delay_ms),
            slow_load_threshold_ms: env_or(
                "SLOW_LOAD_THRESHOLD_MS",
                defaults.slow_load_threshold_ms,
            ),
            server_port: env_or("SERVER_PORT", defaults.server_port),
        }
    }

    // == Validate ==
    /// Rejects budgets and buffer sizes that would make the cache unusable.
    pub fn validate(&self) -> Result<()> {
        if self.max_bytes == 0 {
            return Err(CacheError::InvalidConfig(
                "max_bytes must be greater than zero".to_string(),
            ));
        }
        if self.max_entries == 0 {
            return Err(CacheError::InvalidConfig(
                "max_entries must be greater than zero".to_string(),
            ));
        }
        if self.ring_buffer_size == 0 {
            return Err(CacheError::InvalidConfig(
                "ring_buffer_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    // == Apply ==
    /// Returns a copy of this config with `update` merged in.
    ///
    /// The merged config is validated as a whole; on error nothing is applied
    /// and the caller keeps using `self`.
    pub fn apply(&self, update: &ConfigUpdate) -> Result<Config> {
        let merged = Config {
            default_ttl_ms: update.default_ttl_ms.unwrap_or(self.default_ttl_ms),
            max_bytes: update.max_bytes.unwrap_or(self.max_bytes),
            max_entries: update.max_entries.unwrap_or(self.max_entries),
            ring_buffer_size: update.ring_buffer_size.unwrap_or(self.ring_buffer_size),
            metrics_enabled: update.metrics_enabled.unwrap_or(self.metrics_enabled),
            compression_enabled: update
                .compression_enabled
                .unwrap_or(self.compression_enabled),
            preload_delay_ms: update.preload_delay_ms.unwrap_or(self.preload_delay_ms),
            slow_load_threshold_ms: update
                .slow_load_threshold_ms
                .unwrap_or(self.slow_load_threshold_ms),
            server_port: self.server_port,
        };
        merged.validate()?;
        Ok(merged)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl_ms: 15 * 60 * 1000,
            max_bytes: 5 * 1024 * 1024,
            max_entries: 1000,
            ring_buffer_size: 100,
            metrics_enabled: true,
            compression_enabled: true,
            preload_delay_ms: 100,
            slow_load_threshold_ms: 10,
            server_port: 3000,
        }
    }
}

// == Config Update ==
/// Partial configuration update; unspecified fields keep their prior value.
///
/// The server port is fixed at start-up and cannot be changed here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigUpdate {
    pub default_ttl_ms: Option<u64>,
    pub max_bytes: Option<u64>,
    pub max_entries: Option<usize>,
    pub ring_buffer_size: Option<usize>,
    pub metrics_enabled: Option<bool>,
    pub compression_enabled: Option<bool>,
    pub preload_delay_ms: Option<u64>,
    pub slow_load_threshold_ms: Option<u64>,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
