//! Bounded LRU cache for resolved elements.
//!
//! Compiling a template resolves each element token once; identical tokens
//! repeated across templates reuse the already-resolved element. The cache
//! is keyed by the raw token text and bounded: when full, the
//! least-recently-used entry is evicted. Eviction timing is an
//! implementation detail — a miss simply falls back to normal resolution.
//!
//! A `RwLock` guards the map: containment and size checks take the shared
//! lock; lookups touch recency and therefore take the exclusive lock, as do
//! inserts.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, PoisonError, RwLock};

use crate::element::Element;

/// Default number of cached elements.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

#[derive(Default)]
struct Entries {
    map: HashMap<String, Arc<Element>>,
    // Keys ordered least- to most-recently used.
    order: VecDeque<String>,
}

impl Entries {
    fn touch(&mut self, key: &str) {
        self.order.retain(|k| k != key);
        self.order.push_back(key.to_string());
    }
}

/// A bounded, thread-safe element cache.
pub struct ElementCache {
    entries: RwLock<Entries>,
    capacity: usize,
}

impl ElementCache {
    /// Creates a cache holding at most `capacity` elements.
    ///
    /// A capacity of zero disables caching entirely.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            capacity,
        }
    }

    /// Returns the cached element for `key`, marking it most recently
    /// used.
    pub fn get(&self, key: &str) -> Option<Arc<Element>> {
        if self.capacity == 0 {
            return None;
        }
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let found = entries.map.get(key).cloned()?;
        entries.touch(key);
        Some(found)
    }

    /// Inserts an element, evicting the least-recently-used entry when the
    /// cache is full.
    pub fn insert(&self, key: String, element: Arc<Element>) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if !entries.map.contains_key(&key) && entries.map.len() >= self.capacity {
            if let Some(oldest) = entries.order.pop_front() {
                entries.map.remove(&oldest);
            }
        }
        entries.touch(&key);
        entries.map.insert(key, element);
    }

    /// Returns true when `key` is cached, without touching recency.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .map
            .contains_key(key)
    }

    /// Returns the number of cached elements.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .map
            .len()
    }

    /// Returns true when the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached element.
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.map.clear();
        entries.order.clear();
    }
}
