//! Metrics Module
//!
//! Performance telemetry for cache operations: samples, a bounded recorder and
//! windowed averages.

mod recorder;
mod sample;

pub use recorder::MetricsRecorder;
pub use sample::{optimization_score, AggregateMetrics, PerformanceSample, SCORE_THRESHOLD_MS};
