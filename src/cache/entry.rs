//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL and access
//! bookkeeping.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A cached value and its metadata. Owned exclusively by the store.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored value
    pub value: T,
    /// Insertion timestamp (Unix milliseconds)
    pub inserted_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
    /// Number of successful reads
    pub access_count: u64,
    /// Timestamp of the last successful read, or of insertion
    pub last_accessed_at: u64,
    /// Estimated size, fixed at write time
    pub size_bytes: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new entry expiring `ttl_ms` after `now`.
    pub fn new(value: T, size_bytes: u64, now: u64, ttl_ms: u64) -> Self {
        Self {
            value,
            inserted_at: now,
            expires_at: now.saturating_add(ttl_ms),
            access_count: 0,
            last_accessed_at: now,
            size_bytes,
        }
    }

    // == Is Expired ==
    /// An entry is expired once `now` is strictly past `expires_at`.
    pub fn is_expired_at(&self, now: u64) -> bool {
        now > self.expires_at
    }

    // == Touch ==
    /// Records a successful read.
    pub fn touch(&mut self, now: u64) {
        self.access_count += 1;
        self.last_accessed_at = now;
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
