//! Performance Samples
//!
//! One sample per cache operation, plus the averaged view returned for a time
//! window.

use serde::{Deserialize, Serialize};

use crate::cache::current_timestamp_ms;

/// Loads faster than this score a full 100.
pub const SCORE_THRESHOLD_MS: f64 = 100.0;

// == Optimization Score ==
/// Normalized health indicator for a load time.
///
/// 100 below the threshold, then one point lost per additional 10ms, floored
/// at 0.
pub fn optimization_score(load_time_ms: f64) -> f64 {
    if load_time_ms < SCORE_THRESHOLD_MS {
        100.0
    } else {
        (100.0 - (load_time_ms - SCORE_THRESHOLD_MS) / 10.0).max(0.0)
    }
}

// == Performance Sample ==
/// An immutable record of one cache operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSample {
    /// Key of the operation (cache key or batch label)
    pub operation_key: String,
    /// Wall-clock duration in milliseconds
    pub load_time_ms: f64,
    /// 1.0 for a hit, 0.0 for a miss; the store hit rate for batch samples
    pub cache_hit_rate: f64,
    /// Estimated size of the returned value
    pub result_size_bytes: u64,
    /// Unix milliseconds when the sample was taken
    pub timestamp: u64,
    /// Derived from `load_time_ms`, 0 to 100
    pub optimization_score: f64,
}

impl PerformanceSample {
    /// Creates a sample stamped with the current time.
    pub fn new(
        operation_key: impl Into<String>,
        load_time_ms: f64,
        cache_hit_rate: f64,
        result_size_bytes: u64,
    ) -> Self {
        Self {
            operation_key: operation_key.into(),
            load_time_ms,
            cache_hit_rate,
            result_size_bytes,
            timestamp: current_timestamp_ms(),
            optimization_score: optimization_score(load_time_ms),
        }
    }

    /// Sample for a single lookup that either hit or missed.
    pub fn lookup(
        operation_key: impl Into<String>,
        load_time_ms: f64,
        cache_hit: bool,
        result_size_bytes: u64,
    ) -> Self {
        let rate = if cache_hit { 1.0 } else { 0.0 };
        Self::new(operation_key, load_time_ms, rate, result_size_bytes)
    }

    /// Overrides the timestamp.
    pub fn at(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }
}

// == Aggregate Metrics ==
/// Per-field arithmetic mean over the samples in a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateMetrics {
    pub load_time_ms: f64,
    pub cache_hit_rate: f64,
    pub result_size_bytes: f64,
    pub optimization_score: f64,
    /// Latest timestamp among the averaged samples
    pub timestamp: u64,
    pub sample_count: usize,
}

impl AggregateMetrics {
    /// Averages `samples`, or returns None if there are none.
    pub fn from_samples<'a>(samples: impl IntoIterator<Item = &'a PerformanceSample>) -> Option<Self> {
        let mut sum = AggregateMetrics {
            load_time_ms: 0.0,
            cache_hit_rate: 0.0,
            result_size_bytes: 0.0,
            optimization_score: 0.0,
            timestamp: 0,
            sample_count: 0,
        };

        for sample in samples {
            sum.load_time_ms += sample.load_time_ms;
            sum.cache_hit_rate += sample.cache_hit_rate;
            sum.result_size_bytes += sample.result_size_bytes as f64;
            sum.optimization_score += sample.optimization_score;
            sum.timestamp = sum.timestamp.max(sample.timestamp);
            sum.sample_count += 1;
        }

        if sum.sample_count == 0 {
            return None;
        }

        let count = sum.sample_count as f64;
        Some(AggregateMetrics {
            load_time_ms: sum.load_time_ms / count,
            cache_hit_rate: sum.cache_hit_rate / count,
            result_size_bytes: sum.result_size_bytes / count,
            optimization_score: sum.optimization_score / count,
            ..sum
        })
    }
}
