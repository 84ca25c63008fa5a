// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded classification cache with insertion-order eviction.
//!
//! Keys are normalized (trimmed, lower-cased) input text. Eviction is FIFO:
//! when full, the first-inserted entry is dropped regardless of how recently
//! it was read. There is no expiry.

use std::collections::{HashMap, VecDeque};

use sprocket_core::types::NluResult;

/// Normalizes message text into a cache key.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// A bounded FIFO cache of classification results.
#[derive(Debug)]
pub struct ClassificationCache {
    capacity: usize,
    order: VecDeque<String>,
    entries: HashMap<String, NluResult>,
}

impl ClassificationCache {
    /// Creates a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            order: VecDeque::new(),
            entries: HashMap::new(),
        }
    }

    /// Looks up a result by raw text. Reads do not affect eviction order.
    pub fn get(&self, text: &str) -> Option<NluResult> {
        self.entries.get(&normalize(text)).cloned()
    }

    /// Inserts a result under the normalized key.
    ///
    /// Re-inserting an existing key replaces the value but keeps its original
    /// position in the eviction order. On overflow the oldest inserted entry
    /// is evicted.
    pub fn insert(&mut self, text: &str, result: NluResult) {
        let key = normalize(text);
        if self.entries.insert(key.clone(), result).is_none() {
            self.order.push_back(key);
            if self.order.len() > self.capacity
                && let Some(oldest) = self.order.pop_front()
            {
                self.entries.remove(&oldest);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn result(intent: &str) -> NluResult {
        NluResult {
            intent: intent.into(),
            confidence: 0.8,
            entities: BTreeMap::new(),
            message: "m".into(),
        }
    }

    #[test]
    fn keys_are_normalized() {
        let mut cache = ClassificationCache::new(4);
        cache.insert("  你好  ", result("greeting"));
        assert!(cache.get("你好").is_some());
        assert!(cache.get("HELLO").is_none());

        cache.insert("Hello World", result("greeting"));
        assert!(cache.get("hello world").is_some());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn overflow_evicts_exactly_the_first_inserted() {
        let n = 5;
        let mut cache = ClassificationCache::new(n);
        for i in 0..=n {
            cache.insert(&format!("key-{i}"), result(&format!("intent-{i}")));
        }
        assert_eq!(cache.len(), n);
        assert!(cache.get("key-0").is_none(), "first inserted must be evicted");
        for i in 1..=n {
            assert!(cache.get(&format!("key-{i}")).is_some(), "key-{i} must survive");
        }
    }

    #[test]
    fn reads_do_not_refresh_eviction_order() {
        let mut cache = ClassificationCache::new(2);
        cache.insert("a", result("a"));
        cache.insert("b", result("b"));
        // Read "a" then overflow; FIFO still evicts "a".
        assert!(cache.get("a").is_some());
        cache.insert("c", result("c"));
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn reinsert_keeps_original_position() {
        let mut cache = ClassificationCache::new(2);
        cache.insert("a", result("a1"));
        cache.insert("b", result("b"));
        cache.insert("a", result("a2"));
        assert_eq!(cache.get("a").unwrap().intent, "a2");
        // "a" still occupies the oldest slot.
        cache.insert("c", result("c"));
        assert!(cache.get("a").is_none());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let mut cache = ClassificationCache::new(0);
        cache.insert("a", result("a"));
        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.len(), 1);
    }
}
