//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with access-order tracking,
//! lazy TTL expiration and byte-budget eviction.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::stats::Counters;
use crate::cache::{estimate_size, AccessOrder, CacheEntry, CacheStats};
use crate::config::Config;

// == Cache Store ==
/// Key -> entry map with a byte budget and an entry cap.
///
/// Not synchronized; the service wraps one store per namespace in a lock.
#[derive(Debug)]
pub struct CacheStore<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// Least-recently-accessed ordering
    order: AccessOrder,
    /// Hit/miss/eviction counters
    counters: Counters,
    /// Running sum of `size_bytes` over `entries`
    total_bytes: u64,
    /// Byte budget
    max_bytes: u64,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// TTL in milliseconds for entries without explicit TTL
    default_ttl_ms: u64,
}

impl<T: Serialize + Clone> CacheStore<T> {
    // == Constructor ==
    /// Creates a new store.
    ///
    /// # Arguments
    /// * `default_ttl_ms` - TTL for entries written without an override
    /// * `max_bytes` - Byte budget across all entries
    /// * `max_entries` - Maximum number of entries
    pub fn new(default_ttl_ms: u64, max_bytes: u64, max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: AccessOrder::new(),
            counters: Counters::default(),
            total_bytes: 0,
            max_bytes,
            max_entries,
            default_ttl_ms,
        }
    }

    /// Creates a store sized from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.default_ttl_ms, config.max_bytes, config.max_entries)
    }

    // == Reconfigure ==
    /// Replaces the limits used by subsequent operations.
    ///
    /// Existing entries keep their expiry. A tighter budget is enforced on the
    /// next `set`.
    pub fn reconfigure(&mut self, default_ttl_ms: u64, max_bytes: u64, max_entries: usize) {
        self.default_ttl_ms = default_ttl_ms;
        self.max_bytes = max_bytes;
        self.max_entries = max_entries;
    }

    // == Set ==
    /// Stores a value, replacing any entry under the same key.
    ///
    /// After insertion, least recently accessed entries are evicted until the
    /// store is back within its byte budget and entry cap. The entry just
    /// written is never evicted, so a single value larger than the budget
    /// leaves the store over budget holding only that value.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl_ms` - Optional TTL in milliseconds (uses the default if None)
    pub fn set(&mut self, key: impl Into<String>, value: T, ttl_ms: Option<u64>) {
        self.set_at(key.into(), value, ttl_ms, current_timestamp_ms());
    }

    pub(crate) fn set_at(&mut self, key: String, value: T, ttl_ms: Option<u64>, now: u64) {
        let size_bytes = estimate_size(&value);
        let ttl = ttl_ms.unwrap_or(self.default_ttl_ms);

        // Release the replaced entry's bytes before accounting for the new one
        if let Some(previous) = self.entries.remove(&key) {
            self.total_bytes -= previous.size_bytes;
        }

        self.entries
            .insert(key.clone(), CacheEntry::new(value, size_bytes, now, ttl));
        self.total_bytes += size_bytes;
        self.order.touch(&key);

        self.enforce_limits();
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns the value if found and not expired. Expired entries are removed
    /// and counted as misses.
    pub fn get(&mut self, key: &str) -> Option<T> {
        self.get_with_size(key).map(|(value, _)| value)
    }

    /// Like `get`, also returning the entry's recorded size.
    pub fn get_with_size(&mut self, key: &str) -> Option<(T, u64)> {
        self.get_at(key, current_timestamp_ms())
    }

    pub(crate) fn get_at(&mut self, key: &str, now: u64) -> Option<(T, u64)> {
        let expired = match self.entries.get(key) {
            None => {
                self.counters.misses += 1;
                return None;
            }
            Some(entry) => entry.is_expired_at(now),
        };

        if expired {
            self.remove_entry(key);
            self.counters.expirations += 1;
            self.counters.misses += 1;
            debug!("Cache entry expired on read: {}", key);
            return None;
        }

        let entry = self.entries.get_mut(key)?;
        entry.touch(now);
        let found = (entry.value.clone(), entry.size_bytes);
        self.order.touch(key);
        self.counters.hits += 1;
        Some(found)
    }

    // == Delete ==
    /// Removes an entry by key, returning whether one was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key).is_some()
    }

    // == Clear ==
    /// Drops every entry and resets the byte total and all counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.counters = Counters::default();
        self.total_bytes = 0;
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot(self.entries.len(), self.total_bytes)
    }

    /// Current hit rate without building a full stats snapshot.
    pub fn hit_rate(&self) -> f64 {
        self.counters.hit_rate()
    }

    /// Borrows an entry's metadata without counting a read.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry<T>> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry<T>> {
        let entry = self.entries.remove(key)?;
        self.order.remove(key);
        self.total_bytes -= entry.size_bytes;
        Some(entry)
    }

    fn enforce_limits(&mut self) {
        while (self.total_bytes > self.max_bytes || self.entries.len() > self.max_entries)
            && self.entries.len() > 1
        {
            let Some(oldest) = self.order.pop_oldest() else {
                break;
            };
            if let Some(entry) = self.entries.remove(&oldest) {
                self.total_bytes -= entry.size_bytes;
                self.counters.evictions += 1;
                debug!(
                    "Evicted cache entry {} ({} bytes, {} bytes tracked)",
                    oldest, entry.size_bytes, self.total_bytes
                );
            }
        }
    }
}
