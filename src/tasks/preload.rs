//! Preload Scheduler
//!
//! Warms a content cache in two phases: high-priority sections are loaded
//! concurrently before `preload` returns, low-priority sections are loaded
//! concurrently in a background task after a short delay.

use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

use crate::metrics::PerformanceSample;
use crate::service::ContentCache;

/// Operation key of the batch sample recorded per preload call.
pub const PRELOAD_OPERATION_KEY: &str = "preload";

type ProducerFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'static>>;
type BoxedProducer<T, E> = Box<dyn FnOnce() -> ProducerFuture<T, E> + Send + 'static>;

// == Priority ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    /// Loaded before `preload` returns
    High,
    /// Loaded after the configured delay, in the background
    Low,
}

// == Preload Section ==
/// One cache key and the producer that fills it.
pub struct PreloadSection<T, E> {
    pub key: String,
    pub priority: Priority,
    producer: BoxedProducer<T, E>,
}

impl<T, E> PreloadSection<T, E> {
    pub fn new<F, Fut>(key: impl Into<String>, priority: Priority, producer: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self {
            key: key.into(),
            priority,
            producer: Box::new(move || Box::pin(producer())),
        }
    }

    pub fn high<F, Fut>(key: impl Into<String>, producer: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self::new(key, Priority::High, producer)
    }

    pub fn low<F, Fut>(key: impl Into<String>, producer: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self::new(key, Priority::Low, producer)
    }
}

// == Preload Scheduler ==
/// Issues batches of `get_or_compute` calls against one cache.
#[derive(Clone)]
pub struct PreloadScheduler<T> {
    cache: ContentCache<T>,
}

impl<T> PreloadScheduler<T>
where
    T: Serialize + Clone + Send + Sync + 'static,
{
    pub fn new(cache: ContentCache<T>) -> Self {
        Self { cache }
    }

    /// Loads `sections` into the cache.
    ///
    /// High-priority sections run concurrently and are awaited; if any of them
    /// fails, the first failure in section order is returned once all have
    /// finished and the low-priority sections are never scheduled. A panicking
    /// high-priority producer resumes its panic here. Otherwise low-priority
    /// sections are handed to a background task that waits `preload_delay_ms`
    /// first; their failures are only logged. The returned handle may be
    /// awaited or dropped.
    ///
    /// One batch sample is recorded on success, timed over the high-priority
    /// phase and carrying the store hit rate observed at call time.
    pub async fn preload<E>(
        &self,
        sections: Vec<PreloadSection<T, E>>,
    ) -> Result<Option<JoinHandle<()>>, E>
    where
        E: Display + Send + 'static,
    {
        let started = Instant::now();
        let hit_rate = self.cache.hit_rate().await;

        let (high, low): (Vec<_>, Vec<_>) = sections
            .into_iter()
            .partition(|s| s.priority == Priority::High);
        info!(
            "Preloading {} high-priority and {} low-priority sections",
            high.len(),
            low.len()
        );

        run_sections(&self.cache, high, true).await?;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        let deferred = if low.is_empty() {
            None
        } else {
            let delay = Duration::from_millis(self.cache.config().await.preload_delay_ms);
            Some(spawn_deferred(self.cache.clone(), low, delay))
        };

        self.cache
            .record(PerformanceSample::new(PRELOAD_OPERATION_KEY, elapsed_ms, hit_rate, 0))
            .await;
        debug!("High-priority preload finished in {:.2}ms", elapsed_ms);
        Ok(deferred)
    }
}

/// Runs every section concurrently; returns the first failure in input order.
///
/// With `propagate_panics`, a producer panic is resumed on the caller once
/// every section has finished.
async fn run_sections<T, E>(
    cache: &ContentCache<T>,
    sections: Vec<PreloadSection<T, E>>,
    propagate_panics: bool,
) -> Result<(), E>
where
    T: Serialize + Clone + Send + Sync + 'static,
    E: Display + Send + 'static,
{
    let mut set = JoinSet::new();
    for (index, section) in sections.into_iter().enumerate() {
        let cache = cache.clone();
        set.spawn(async move {
            let result = cache
                .get_or_compute(&section.key, section.producer, None)
                .await
                .map(|_| ());
            (index, section.key, result)
        });
    }

    let mut first_failure: Option<(usize, E)> = None;
    let mut panic = None;
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((_, _, Ok(()))) => {}
            Ok((index, key, Err(err))) => {
                warn!("Preload of {} failed: {}", key, err);
                if first_failure.as_ref().map_or(true, |(i, _)| index < *i) {
                    first_failure = Some((index, err));
                }
            }
            Err(join_err) if propagate_panics && join_err.is_panic() => {
                warn!("Preload task panicked: {}", join_err);
                if panic.is_none() {
                    panic = Some(join_err.into_panic());
                }
            }
            Err(join_err) => warn!("Preload task aborted: {}", join_err),
        }
    }

    if let Some(payload) = panic {
        std::panic::resume_unwind(payload);
    }

    match first_failure {
        Some((_, err)) => Err(err),
        None => Ok(()),
    }
}

fn spawn_deferred<T, E>(
    cache: ContentCache<T>,
    sections: Vec<PreloadSection<T, E>>,
    delay: Duration,
) -> JoinHandle<()>
where
    T: Serialize + Clone + Send + Sync + 'static,
    E: Display + Send + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let count = sections.len();
        if run_sections(&cache, sections, false).await.is_ok() {
            debug!("Deferred preload of {} sections finished", count);
        }
    })
}
