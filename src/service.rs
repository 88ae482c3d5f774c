//! Content Cache Service
//!
//! Get-or-compute orchestration over one store and one metrics recorder.
//! Construct one `ContentCache` per logical namespace at start-up and hand
//! clones of it to every consumer; clones share the same state.

use std::convert::Infallible;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{prune_nulls, CacheStats, CacheStore};
use crate::config::{Config, ConfigUpdate};
use crate::error::Result;
use crate::metrics::{AggregateMetrics, MetricsRecorder, PerformanceSample};

/// Number of samples carried in a snapshot.
pub const SNAPSHOT_SAMPLES: usize = 10;

// == Performance Snapshot ==
/// Trimmed, serializable view of recent telemetry and the live config.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceSnapshot {
    pub captured_at: DateTime<Utc>,
    pub recent_samples: Vec<PerformanceSample>,
    pub config: Config,
}

// == Content Cache ==
/// Shared handle to a cache namespace.
///
/// Each lock is held only for the duration of a single store or recorder
/// operation, never while a producer is running.
pub struct ContentCache<T> {
    store: Arc<RwLock<CacheStore<T>>>,
    recorder: Arc<RwLock<MetricsRecorder>>,
    config: Arc<RwLock<Config>>,
}

impl<T> Clone for ContentCache<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            recorder: Arc::clone(&self.recorder),
            config: Arc::clone(&self.config),
        }
    }
}

impl<T> ContentCache<T>
where
    T: Serialize + Clone + Send + Sync + 'static,
{
    /// Creates a namespace from a validated configuration.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store: Arc::new(RwLock::new(CacheStore::from_config(&config))),
            recorder: Arc::new(RwLock::new(MetricsRecorder::new(config.ring_buffer_size))),
            config: Arc::new(RwLock::new(config)),
        })
    }

    // == Get Or Compute ==
    /// Returns the cached value for `key`, or runs `producer` and caches its
    /// result.
    ///
    /// The producer is not invoked on a hit. A producer error is returned to
    /// the caller unchanged and nothing is cached. Two callers missing on the
    /// same key at the same time both run their producer.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        key: &str,
        producer: F,
        ttl_ms: Option<u64>,
    ) -> std::result::Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Display,
    {
        let lookup_started = Instant::now();
        let cached = self.store.write().await.get_with_size(key);

        if let Some((value, size)) = cached {
            let elapsed = elapsed_ms(lookup_started);
            debug!("Cache hit: {} ({:.3}ms)", key, elapsed);
            self.record(PerformanceSample::lookup(key, elapsed, true, size))
                .await;
            return Ok(value);
        }

        debug!("Cache miss: {}", key);
        let load_started = Instant::now();
        let value = match producer().await {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "Producer for {} failed after {:.3}ms: {}",
                    key,
                    elapsed_ms(load_started),
                    err
                );
                return Err(err);
            }
        };
        let load_ms = elapsed_ms(load_started);

        let size = {
            let mut store = self.store.write().await;
            store.set(key, value.clone(), ttl_ms);
            store.peek(key).map(|entry| entry.size_bytes).unwrap_or(0)
        };

        let slow_threshold = self.config.read().await.slow_load_threshold_ms as f64;
        if load_ms > slow_threshold {
            debug!("Slow load for {}: {:.2}ms ({} bytes)", key, load_ms, size);
        }

        self.record(PerformanceSample::lookup(key, load_ms, false, size))
            .await;
        Ok(value)
    }

    /// `get_or_compute` for a synchronous producer that cannot fail.
    pub async fn get_or_insert_with<F>(&self, key: &str, producer: F, ttl_ms: Option<u64>) -> T
    where
        F: FnOnce() -> T,
    {
        let result = self
            .get_or_compute(
                key,
                || std::future::ready(Ok::<T, Infallible>(producer())),
                ttl_ms,
            )
            .await;
        match result {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    // == Direct Store Access ==
    /// Reads a value without producing one on a miss.
    pub async fn get(&self, key: &str) -> Option<T> {
        self.store.write().await.get(key)
    }

    /// Writes a value directly.
    pub async fn set(&self, key: &str, value: T, ttl_ms: Option<u64>) {
        self.store.write().await.set(key, value, ttl_ms);
    }

    /// Removes one entry, returning whether it existed.
    pub async fn invalidate(&self, key: &str) -> bool {
        let removed = self.store.write().await.delete(key);
        if removed {
            debug!("Cache entry cleared: {}", key);
        }
        removed
    }

    /// Drops every entry and resets hit/miss counters.
    pub async fn clear(&self) {
        self.store.write().await.clear();
        info!("Content cache cleared");
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    pub(crate) async fn hit_rate(&self) -> f64 {
        self.store.read().await.hit_rate()
    }

    // == Metrics ==
    /// Records a sample unless metrics are disabled.
    pub async fn record(&self, sample: PerformanceSample) {
        if !self.config.read().await.metrics_enabled {
            return;
        }
        self.recorder.write().await.record(sample);
    }

    /// Averages the samples recorded in the last `window_ms` milliseconds.
    pub async fn windowed_average(&self, window_ms: u64) -> Option<AggregateMetrics> {
        self.recorder.read().await.windowed_average(window_ms)
    }

    pub async fn clear_metrics(&self) {
        self.recorder.write().await.clear();
    }

    /// Recent samples plus the live configuration.
    pub async fn snapshot(&self) -> PerformanceSnapshot {
        let recent_samples = self.recorder.read().await.recent(SNAPSHOT_SAMPLES);
        let config = self.config().await;
        PerformanceSnapshot {
            captured_at: Utc::now(),
            recent_samples,
            config,
        }
    }

    // == Configuration ==
    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }

    /// Applies a partial configuration update.
    ///
    /// The update is validated as a whole before anything changes. New limits
    /// apply to subsequent operations; cached entries keep their expiry.
    pub async fn update_config(&self, update: &ConfigUpdate) -> Result<Config> {
        let mut config = self.config.write().await;
        let merged = match config.apply(update) {
            Ok(merged) => merged,
            Err(err) => {
                warn!("Rejected configuration update: {}", err);
                return Err(err);
            }
        };

        self.store.write().await.reconfigure(
            merged.default_ttl_ms,
            merged.max_bytes,
            merged.max_entries,
        );
        self.recorder.write().await.resize(merged.ring_buffer_size);
        *config = merged.clone();

        info!(
            "Configuration updated: default_ttl_ms={}, max_bytes={}, max_entries={}, ring_buffer_size={}",
            merged.default_ttl_ms, merged.max_bytes, merged.max_entries, merged.ring_buffer_size
        );
        Ok(merged)
    }

    // == Optimize Content ==
    /// Drops null fields from `content` when compression is enabled.
    ///
    /// Returns the input unchanged when disabled or when the value does not
    /// survive a JSON round trip.
    pub async fn optimize_content<V>(&self, content: V) -> V
    where
        V: Serialize + DeserializeOwned,
    {
        if !self.config.read().await.compression_enabled {
            return content;
        }

        let pruned = match serde_json::to_value(&content) {
            Ok(json) => prune_nulls(json),
            Err(_) => return content,
        };
        serde_json::from_value(pruned).unwrap_or(content)
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
