//! Size Estimation
//!
//! Approximates the footprint of a cached value as the length of its JSON
//! encoding.

use serde::Serialize;
use tracing::debug;

/// Returns the JSON-encoded byte length of `value`.
///
/// Never fails: a value that cannot be serialized is reported as `0` bytes and
/// therefore costs nothing against the byte budget.
pub fn estimate_size<T: Serialize + ?Sized>(value: &T) -> u64 {
    match serde_json::to_vec(value) {
        Ok(bytes) => bytes.len() as u64,
        Err(err) => {
            debug!("Size estimation failed, counting as 0 bytes: {}", err);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::{Error, Serializer};
    use std::collections::HashMap;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("not representable"))
        }
    }

    #[test]
    fn test_string_size_includes_quotes() {
        assert_eq!(estimate_size("abc"), 5);
    }

    #[test]
    fn test_struct_size_matches_json() {
        let mut map = HashMap::new();
        map.insert("a", 1);
        assert_eq!(estimate_size(&map), r#"{"a":1}"#.len() as u64);
    }

    #[test]
    fn test_deterministic() {
        let value = vec!["hero", "footer", "faq"];
        assert_eq!(estimate_size(&value), estimate_size(&value));
    }

    #[test]
    fn test_failure_falls_back_to_zero() {
        assert_eq!(estimate_size(&Unserializable), 0);
    }
}
