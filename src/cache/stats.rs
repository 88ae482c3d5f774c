//! Cache Statistics Module
//!
//! Tracks lookup outcomes and the store's current footprint.

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time view of the store's counters and size.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of live entries
    pub entry_count: usize,
    /// Sum of the estimated sizes of live entries
    pub total_bytes: u64,
    /// Reads that returned a value
    pub hits: u64,
    /// Reads that found nothing or an expired entry
    pub misses: u64,
    /// Entries removed to satisfy the byte budget or entry cap
    pub evictions: u64,
    /// Entries removed because a read found them expired
    pub expirations: u64,
    /// hits / (hits + misses), `0.0` before any read
    pub hit_rate: f64,
}

// == Counters ==
/// Running counters owned by the store; reset by `clear`.
#[derive(Debug, Clone, Default)]
pub(crate) struct Counters {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
}

impl Counters {
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn snapshot(&self, entry_count: usize, total_bytes: u64) -> CacheStats {
        CacheStats {
            entry_count,
            total_bytes,
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            expirations: self.expirations,
            hit_rate: self.hit_rate(),
        }
    }
}
