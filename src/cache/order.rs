//! Insertion Order Tracker
//!
//! Tracks the order in which keys were first inserted, used for capacity
//! eviction. Eviction is strictly oldest-inserted-first; re-setting an
//! existing key does not move it. This is deliberately not an LRU: the
//! simpler policy matches the observed access patterns of report caching,
//! where keys are written once and read for the length of their TTL.

use std::collections::VecDeque;

// == Insertion Order ==
/// Tracks key insertion order for capacity eviction.
///
/// Front = oldest inserted, back = newest inserted.
#[derive(Debug, Default)]
pub struct InsertionOrder {
    order: VecDeque<String>,
}

impl InsertionOrder {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record ==
    /// Records a newly inserted key at the back of the queue.
    ///
    /// Callers must only record keys that are new to the store; overwrites
    /// keep their original position.
    pub fn record(&mut self, key: &str) {
        self.order.push_back(key.to_string());
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Evict Oldest ==
    /// Returns and removes the oldest-inserted key, or None if empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
