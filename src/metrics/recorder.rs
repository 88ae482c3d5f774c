//! Metrics Recorder
//!
//! Bounded ring buffer of performance samples with windowed averaging.

use std::collections::VecDeque;

use crate::cache::current_timestamp_ms;
use crate::metrics::{AggregateMetrics, PerformanceSample};

/// Retains the most recent `capacity` samples.
#[derive(Debug)]
pub struct MetricsRecorder {
    samples: VecDeque<PerformanceSample>,
    capacity: usize,
}

impl MetricsRecorder {
    /// Creates an empty recorder. A zero capacity is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    // == Record ==
    /// Appends a sample, dropping the oldest ones beyond capacity.
    pub fn record(&mut self, sample: PerformanceSample) {
        self.samples.push_back(sample);
        self.truncate();
    }

    // == Windowed Average ==
    /// Averages the samples taken within the last `window_ms` milliseconds.
    pub fn windowed_average(&self, window_ms: u64) -> Option<AggregateMetrics> {
        self.windowed_average_at(window_ms, current_timestamp_ms())
    }

    pub fn windowed_average_at(&self, window_ms: u64, now: u64) -> Option<AggregateMetrics> {
        AggregateMetrics::from_samples(
            self.samples
                .iter()
                .filter(|s| now.saturating_sub(s.timestamp) <= window_ms),
        )
    }

    // == Resize ==
    /// Changes the capacity, discarding the oldest samples if it shrinks.
    pub fn resize(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.truncate();
    }

    /// The `n` most recent samples, oldest first.
    pub fn recent(&self, n: usize) -> Vec<PerformanceSample> {
        let skip = self.samples.len().saturating_sub(n);
        self.samples.iter().skip(skip).cloned().collect()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    fn truncate(&mut self) {
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }
}
