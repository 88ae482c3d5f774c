//! Cache Module
//!
//! Provides the in-memory content store with TTL expiration, byte-budget
//! eviction and size estimation.

mod access;
mod entry;
mod prune;
mod size;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use access::AccessOrder;
pub use entry::{current_timestamp_ms, CacheEntry};
pub use prune::prune_nulls;
pub use size::estimate_size;
pub use stats::CacheStats;
pub use store::CacheStore;
