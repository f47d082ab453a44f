//! In-Memory Store Module
//!
//! Bounded in-process fallback store: HashMap storage with insertion-order
//! eviction and lazy TTL expiration. Used whenever the remote backend is
//! absent or unreachable.

use std::collections::HashMap;

use crate::cache::{CacheEntry, InsertionOrder};

// == Lookup Outcome ==
/// Result of a local lookup; expired entries are removed as a side effect.
#[derive(Debug)]
pub enum Lookup {
    /// Entry present and live
    Hit(String),
    /// No entry under this key
    Miss,
    /// Entry was present but past its expiry; it has been evicted
    Expired,
}

// == Local Store ==
/// Bounded in-memory store with lazy expiration.
#[derive(Debug)]
pub struct LocalStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Insertion-order tracker for capacity eviction
    order: InsertionOrder,
    /// Hard cap on resident entries
    max_entries: usize,
    /// Size to trim back to once the cap is reached
    trim_target: usize,
}

impl LocalStore {
    // == Constructor ==
    /// Creates a new LocalStore with the given capacity bounds.
    pub fn new(max_entries: usize, trim_target: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            max_entries,
            trim_target,
        }
    }

    // == Get ==
    /// Looks up a key as of `now`, removing the entry if it has expired.
    pub fn get(&mut self, key: &str, now: u64) -> Lookup {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired_at(now) => {
                self.entries.remove(key);
                self.order.remove(key);
                Lookup::Expired
            }
            Some(entry) => Lookup::Hit(entry.value.clone()),
            None => Lookup::Miss,
        }
    }

    // == Insert ==
    /// Stores a serialized value, trimming the store first if a new key would
    /// push it past the hard cap. Returns the number of entries evicted by
    /// the trim (expired sweep included).
    pub fn insert(&mut self, key: String, value: String, ttl_seconds: u64, now: u64) -> usize {
        let is_new = !self.entries.contains_key(&key);

        let mut evicted = 0;
        if is_new && self.entries.len() >= self.max_entries {
            evicted += self.cleanup_expired(now);
            while self.entries.len() >= self.trim_target {
                match self.order.evict_oldest() {
                    Some(oldest) => {
                        self.entries.remove(&oldest);
                        evicted += 1;
                    }
                    None => break,
                }
            }
        }

        self.entries
            .insert(key.clone(), CacheEntry::new(value, ttl_seconds, now));
        if is_new {
            self.order.record(&key);
        }

        evicted
    }

    // == Remove ==
    /// Removes an entry; absent keys are not an error.
    pub fn remove(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.order.remove(key);
            true
        } else {
            false
        }
    }

    // == Clear Matching ==
    /// Removes every key containing `fragment`, returning the count removed.
    pub fn clear_matching(&mut self, fragment: &str) -> usize {
        let matched: Vec<String> = self
            .entries
            .keys()
            .filter(|k| k.contains(fragment))
            .cloned()
            .collect();

        for key in &matched {
            self.entries.remove(key);
            self.order.remove(key);
        }

        matched.len()
    }

    // == Enforce Capacity ==
    /// Evicts oldest-inserted entries until the store is back at the trim
    /// target, returning the count evicted. Invoked by the periodic sweep so
    /// burst growth between the target and the hard cap is reclaimed.
    pub fn enforce_capacity(&mut self) -> usize {
        let mut evicted = 0;
        while self.entries.len() > self.trim_target {
            match self.order.evict_oldest() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                    evicted += 1;
                }
                None => break,
            }
        }
        evicted
    }

    // == Cleanup Expired ==
    /// Removes all entries expired as of `now`, returning the count removed.
    pub fn cleanup_expired(&mut self, now: u64) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
            self.order.remove(key);
        }

        expired.len()
    }

    // == Length ==
    /// Returns the current number of resident entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
