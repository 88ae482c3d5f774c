//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store's budget, accounting and ordering
//! guarantees over generated operation sequences.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::cache::{estimate_size, CacheStore};

// == Test Configuration ==
const TEST_DEFAULT_TTL_MS: u64 = 300_000;
const TEST_MAX_BYTES: u64 = 1024 * 1024;
const TEST_MAX_ENTRIES: usize = 100;
const NOW: u64 = 1_000_000;

// == Strategies ==
/// Generates valid cache keys
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}".prop_map(|s| s)
}

/// Generates content values of varying size
fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,256}".prop_map(|s| s)
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), valid_value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

fn new_store() -> CacheStore<String> {
    CacheStore::new(TEST_DEFAULT_TTL_MS, TEST_MAX_BYTES, TEST_MAX_ENTRIES)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Statistics accuracy
    // *For any* sequence of cache operations, hits and misses SHALL match the
    // outcomes the caller observed.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let mut store = new_store();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => store.set(key, value, None),
                CacheOp::Get { key } => match store.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Delete { key } => {
                    store.delete(&key);
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.entry_count, store.len(), "Entry count mismatch");
    }

    // Round-trip storage
    // *For any* value, storing it and reading it back before expiry SHALL
    // return an equal value, repeatedly.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut store = new_store();

        store.set(key.clone(), value.clone(), None);

        prop_assert_eq!(store.get(&key), Some(value.clone()));
        prop_assert_eq!(store.get(&key), Some(value));
    }

    // Delete removes entry
    #[test]
    fn prop_delete_removes_entry(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut store = new_store();

        store.set(key.clone(), value, None);
        prop_assert!(store.delete(&key), "Delete should report removal");
        prop_assert!(store.get(&key).is_none(), "Key should not exist after delete");
        prop_assert_eq!(store.stats().total_bytes, 0);
    }

    // Overwrite semantics
    // *For any* key written twice, reads SHALL return the second value and
    // only the second value's bytes SHALL be tracked.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        value1 in valid_value_strategy(),
        value2 in valid_value_strategy()
    ) {
        let mut store = new_store();

        store.set(key.clone(), value1, None);
        store.set(key.clone(), value2.clone(), None);

        prop_assert_eq!(store.stats().total_bytes, estimate_size(&value2));
        prop_assert_eq!(store.get(&key), Some(value2));
        prop_assert_eq!(store.len(), 1, "Should have exactly one entry after overwrite");
    }

    // Byte budget invariant
    // *For any* sequence of writes, after each write the tracked bytes SHALL
    // be within budget, unless the store holds a single oversized entry.
    #[test]
    fn prop_byte_budget_enforcement(
        entries in prop::collection::vec(
            (valid_key_strategy(), valid_value_strategy()),
            1..200
        ),
        max_bytes in 1u64..2048
    ) {
        let mut store = CacheStore::new(TEST_DEFAULT_TTL_MS, max_bytes, TEST_MAX_ENTRIES);

        for (key, value) in entries {
            store.set(key, value, None);
            let stats = store.stats();
            prop_assert!(
                stats.total_bytes <= max_bytes || stats.entry_count == 1,
                "Tracked {} bytes over budget {} with {} entries",
                stats.total_bytes,
                max_bytes,
                stats.entry_count
            );
        }
    }

    // Byte accounting consistency
    // *For any* sequence of operations, the running byte total SHALL equal the
    // sum of the live entries' recorded sizes.
    #[test]
    fn prop_byte_accounting_consistency(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let mut store = CacheStore::new(TEST_DEFAULT_TTL_MS, 4096, 20);
        let mut seen: HashSet<String> = HashSet::new();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    seen.insert(key.clone());
                    store.set(key, value, None);
                }
                CacheOp::Get { key } => {
                    store.get(&key);
                }
                CacheOp::Delete { key } => {
                    store.delete(&key);
                }
            }
        }

        let live_bytes: u64 = seen
            .iter()
            .filter_map(|key| store.peek(key))
            .map(|entry| entry.size_bytes)
            .sum();
        prop_assert_eq!(store.stats().total_bytes, live_bytes);
    }

    // Entry cap enforcement
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec(
            (valid_key_strategy(), valid_value_strategy()),
            1..200
        )
    ) {
        let max_entries = 50;
        let mut store = CacheStore::new(TEST_DEFAULT_TTL_MS, TEST_MAX_BYTES, max_entries);

        for (key, value) in entries {
            store.set(key, value, None);
            prop_assert!(
                store.len() <= max_entries,
                "Cache size {} exceeds max {}",
                store.len(),
                max_entries
            );
        }
    }
}

// Property tests for eviction order
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Least recently accessed eviction
    // *For any* set of equally sized entries filling the budget, reading the
    // oldest one SHALL protect it, and the next write SHALL evict the entry
    // that is now least recently accessed.
    #[test]
    fn prop_lru_access_tracking(
        keys in prop::collection::vec(valid_key_strategy(), 3..8),
        new_key in valid_key_strategy()
    ) {
        let unique_keys: Vec<String> = keys
            .into_iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        prop_assume!(unique_keys.len() >= 3);
        prop_assume!(!unique_keys.contains(&new_key));

        // Every value serializes to the same size
        let value = "x".repeat(8);
        let entry_size = estimate_size(&value);
        let budget = entry_size * unique_keys.len() as u64;
        let mut store = CacheStore::new(TEST_DEFAULT_TTL_MS, budget, TEST_MAX_ENTRIES);

        for (i, key) in unique_keys.iter().enumerate() {
            store.set_at(key.clone(), value.clone(), None, NOW + i as u64);
        }
        prop_assert_eq!(store.stats().total_bytes, budget, "Budget should be exactly full");

        let accessed_key = unique_keys[0].clone();
        prop_assert!(store.get_at(&accessed_key, NOW + 100).is_some());
        let expected_evicted = unique_keys[1].clone();

        store.set_at(new_key.clone(), value.clone(), None, NOW + 101);

        prop_assert!(store.peek(&accessed_key).is_some(), "Accessed key should survive");
        prop_assert!(store.peek(&expected_evicted).is_none(), "Second key should be evicted");
        prop_assert!(store.peek(&new_key).is_some(), "New key should exist");
        prop_assert_eq!(store.stats().evictions, 1);
    }

    // Expiry removes on read
    // *For any* entry read after its TTL, the read SHALL miss and the entry
    // SHALL be gone from the store.
    #[test]
    fn prop_ttl_expiration_behavior(
        key in valid_key_strategy(),
        value in valid_value_strategy(),
        ttl_ms in 1u64..10_000
    ) {
        let mut store = new_store();

        store.set_at(key.clone(), value.clone(), Some(ttl_ms), NOW);
        prop_assert_eq!(store.get_at(&key, NOW + ttl_ms).map(|(v, _)| v), Some(value));
        prop_assert!(store.get_at(&key, NOW + ttl_ms + 1).is_none());

        let stats = store.stats();
        prop_assert_eq!(stats.entry_count, 0);
        prop_assert_eq!(stats.total_bytes, 0);
        prop_assert_eq!(stats.hits, 1);
        prop_assert_eq!(stats.misses, 1);
    }
}

// == Property Tests for the Service Layer ==
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Producer invocation count
    // *For any* key, the first get_or_compute SHALL run the producer once and
    // later calls within the TTL SHALL not run it at all.
    #[test]
    fn prop_producer_invoked_once(key in valid_key_strategy(), value in valid_value_strategy(), repeats in 1usize..5) {
        use crate::{Config, ContentCache};
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let cache: ContentCache<String> = ContentCache::new(Config::default()).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..=repeats {
            let counter = Arc::clone(&calls);
            let produced = value.clone();
            let result = tokio_test::block_on(cache.get_or_compute(
                &key,
                move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    std::future::ready(Ok::<_, String>(produced))
                },
                None,
            ));
            prop_assert_eq!(result, Ok(value.clone()));
        }

        prop_assert_eq!(calls.load(Ordering::SeqCst), 1);
        let stats = tokio_test::block_on(cache.stats());
        prop_assert_eq!(stats.hits, repeats as u64);
        prop_assert_eq!(stats.misses, 1);
    }

    // Windowed average
    // *For any* set of samples taken at one instant, the window average SHALL
    // be the arithmetic mean of their load times and scores.
    #[test]
    fn prop_windowed_average_is_mean(loads in prop::collection::vec(0.0f64..2_000.0, 1..50)) {
        use crate::metrics::{optimization_score, MetricsRecorder, PerformanceSample};

        let mut recorder = MetricsRecorder::new(100);
        for load in &loads {
            recorder.record(PerformanceSample::lookup("content", *load, false, 0).at(NOW));
        }

        let avg = recorder.windowed_average_at(0, NOW).unwrap();
        let count = loads.len() as f64;
        let mean_load = loads.iter().sum::<f64>() / count;
        let mean_score = loads.iter().map(|l| optimization_score(*l)).sum::<f64>() / count;

        prop_assert!((avg.load_time_ms - mean_load).abs() < 1e-6);
        prop_assert!((avg.optimization_score - mean_score).abs() < 1e-6);
        prop_assert_eq!(avg.sample_count, loads.len());
    }
}

// == Property Test for Error Response Format ==
// This tests the CacheError -> HTTP response conversion
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Error response format
    // *For any* error condition, the HTTP response SHALL carry a JSON body
    // with an "error" field holding the error's message.
    #[test]
    fn prop_error_response_format(
        error_msg in "[a-zA-Z0-9 _-]{1,100}"
    ) {
        use crate::error::CacheError;
        use axum::body::to_bytes;
        use axum::response::IntoResponse;

        let error_variants = vec![
            CacheError::NotFound(error_msg.clone()),
            CacheError::InvalidConfig(error_msg.clone()),
            CacheError::InvalidRequest(error_msg.clone()),
            CacheError::Internal(error_msg.clone()),
        ];

        for error in error_variants {
            let expected_msg = error.to_string();
            let response = error.into_response();

            let content_type = response.headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok());
            prop_assert!(
                content_type.map(|ct| ct.contains("application/json")).unwrap_or(false),
                "Response should have JSON content-type"
            );

            let bytes = tokio_test::block_on(to_bytes(response.into_body(), usize::MAX)).unwrap();
            let json: serde_json::Value = serde_json::from_slice(&bytes)
                .expect("Response body should be valid JSON");

            prop_assert_eq!(json["error"].as_str(), Some(expected_msg.as_str()));
        }
    }
}

// == Property Test for Concurrent Operation Correctness ==
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Concurrent operation correctness
    // *For any* set of concurrent reads and writes through the service, every
    // read SHALL return a complete value that was written under that key, and
    // the store SHALL stay within its limits.
    #[test]
    fn prop_concurrent_operation_correctness(
        initial_entries in prop::collection::vec(
            (valid_key_strategy(), valid_value_strategy()),
            1..20
        ),
        operations in prop::collection::vec(cache_op_strategy(), 10..50)
    ) {
        use crate::{Config, ContentCache};

        let rt = tokio::runtime::Runtime::new().unwrap();

        rt.block_on(async {
            let cache: ContentCache<String> = ContentCache::new(Config {
                max_entries: TEST_MAX_ENTRIES,
                ..Config::default()
            })
            .unwrap();

            // Every value ever written under each key
            let mut written: HashMap<String, HashSet<String>> = HashMap::new();
            for (key, value) in &initial_entries {
                cache.set(key, value.clone(), None).await;
                written.entry(key.clone()).or_default().insert(value.clone());
            }
            for op in &operations {
                if let CacheOp::Set { key, value } = op {
                    written.entry(key.clone()).or_default().insert(value.clone());
                }
            }

            let mut handles = vec![];
            for op in operations {
                let cache = cache.clone();
                let written = written.clone();

                handles.push(tokio::spawn(async move {
                    match op {
                        CacheOp::Set { key, value } => {
                            cache.set(&key, value, None).await;
                            Ok::<_, String>(())
                        }
                        CacheOp::Get { key } => {
                            if let Some(value) = cache.get(&key).await {
                                let known = written.get(&key).map_or(false, |v| v.contains(&value));
                                if !known {
                                    return Err(format!("Unexpected value for key '{}'", key));
                                }
                            }
                            Ok(())
                        }
                        CacheOp::Delete { key } => {
                            cache.invalidate(&key).await;
                            Ok(())
                        }
                    }
                }));
            }

            for handle in handles {
                let result = handle.await.expect("Task should not panic");
                prop_assert!(result.is_ok(), "Concurrent operation failed: {:?}", result);
            }

            let stats = cache.stats().await;
            prop_assert!(
                stats.entry_count <= TEST_MAX_ENTRIES,
                "Cache should not exceed max entries"
            );
            prop_assert!(
                (0.0..=1.0).contains(&stats.hit_rate),
                "Hit rate should be between 0 and 1, got {}",
                stats.hit_rate
            );

            Ok(())
        })?;
    }
}
