//! API Handlers
//!
//! HTTP request handlers for each admin endpoint.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::cache::CacheStats;
use crate::config::{Config, ConfigUpdate};
use crate::error::{CacheError, Result};
use crate::models::{
    ClearResponse, GetResponse, HealthResponse, MetricsQuery, MetricsResponse, SetContentRequest,
    SetResponse,
};
use crate::service::{ContentCache, PerformanceSnapshot};

/// Application state shared across all handlers.
///
/// Holds a handle to the JSON content namespace; clones share the same cache.
#[derive(Clone)]
pub struct AppState {
    pub cache: ContentCache<Value>,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    pub fn new(cache: ContentCache<Value>) -> Self {
        Self { cache }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(ContentCache::new(config.clone())?))
    }
}

/// Handler for PUT /content
///
/// Stores JSON content, pruning null fields when compression is enabled.
pub async fn set_content_handler(
    State(state): State<AppState>,
    Json(req): Json<SetContentRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let value = state.cache.optimize_content(req.value).await;
    state.cache.set(&req.key, value, req.ttl_ms).await;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /content/:key
pub async fn get_content_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get(&key).await {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /cache/:key
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ClearResponse>> {
    if state.cache.invalidate(&key).await {
        Ok(Json(ClearResponse::entry(key)))
    } else {
        Err(CacheError::NotFound(key))
    }
}

/// Handler for DELETE /cache
///
/// Drops every entry and resets the hit/miss counters.
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.clear().await;
    Json(ClearResponse::all())
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats().await)
}

/// Handler for GET /metrics
///
/// Averages the samples recorded within `window_ms`; 404 when there are none.
pub async fn metrics_handler(
    State(state): State<AppState>,
    Query(query): Query<MetricsQuery>,
) -> Result<Json<MetricsResponse>> {
    let window_ms = query.window_ms();
    let metrics = state
        .cache
        .windowed_average(window_ms)
        .await
        .ok_or_else(|| {
            CacheError::NotFound(format!("no samples in the last {}ms", window_ms))
        })?;

    Ok(Json(MetricsResponse { window_ms, metrics }))
}

/// Handler for DELETE /metrics
///
/// Drops every recorded sample; cached entries and counters are untouched.
pub async fn clear_metrics_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.clear_metrics().await;
    Json(ClearResponse::metrics())
}

/// Handler for GET /metrics/snapshot
pub async fn snapshot_handler(State(state): State<AppState>) -> Json<PerformanceSnapshot> {
    Json(state.cache.snapshot().await)
}

/// Handler for PUT /config
///
/// Applies a partial update; the whole update is rejected if any field is invalid.
pub async fn update_config_handler(
    State(state): State<AppState>,
    Json(update): Json<ConfigUpdate>,
) -> Result<Json<Config>> {
    let config = state.cache.update_config(&update).await?;
    Ok(Json(config))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
