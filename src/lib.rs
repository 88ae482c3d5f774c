//! Content Cache - bounded in-memory cache for site content
//!
//! Provides get-or-compute caching with TTL expiration, byte-budget eviction,
//! performance telemetry and priority-based preloading.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod service;
pub mod tasks;

pub use api::AppState;
pub use config::{Config, ConfigUpdate};
pub use error::CacheError;
pub use service::{ContentCache, PerformanceSnapshot};
pub use tasks::{PreloadScheduler, PreloadSection, Priority};
