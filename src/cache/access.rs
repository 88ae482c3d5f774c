//! Access Order Module
//!
//! Tracks the order in which keys were last written or read so the store can
//! evict the least recently accessed entry first.

use std::collections::{BTreeMap, HashMap};

// == Access Order ==
/// Orders keys by their most recent access.
///
/// Every touch stamps the key with a strictly increasing sequence number, so
/// keys accessed within the same millisecond still evict in the order they
/// were touched.
#[derive(Debug, Default)]
pub struct AccessOrder {
    /// Sequence number -> key, oldest first
    by_seq: BTreeMap<u64, String>,
    /// Key -> its current sequence number
    seq_of: HashMap<String, u64>,
    next_seq: u64,
}

impl AccessOrder {
    // == Constructor ==
    /// Creates an empty access order.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as the most recently accessed.
    pub fn touch(&mut self, key: &str) {
        let seq = self.next_seq;
        self.next_seq += 1;

        if let Some(previous) = self.seq_of.insert(key.to_string(), seq) {
            self.by_seq.remove(&previous);
        }
        self.by_seq.insert(seq, key.to_string());
    }

    // == Remove ==
    /// Stops tracking a key. Unknown keys are ignored.
    pub fn remove(&mut self, key: &str) {
        if let Some(seq) = self.seq_of.remove(key) {
            self.by_seq.remove(&seq);
        }
    }

    // == Pop Oldest ==
    /// Removes and returns the least recently accessed key.
    pub fn pop_oldest(&mut self) -> Option<String> {
        let (_, key) = self.by_seq.pop_first()?;
        self.seq_of.remove(&key);
        Some(key)
    }

    /// Forgets every key.
    pub fn clear(&mut self) {
        self.by_seq.clear();
        self.seq_of.clear();
    }

    pub fn len(&self) -> usize {
        self.seq_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq_of.is_empty()
    }
}
