// SPDX-License-Identifier: MIT
//
// Per-stream state cache.
//
// Maps (stream, category) to the last value successfully written for that
// category on that stream. A hit means the terminal is already in the
// requested state and nothing needs to be sent.
//
// Bounded with least-recently-used eviction. Recency is a monotonic stamp
// taken from a counter that advances on every touch (lookup hit or put), so
// no two live entries ever share a stamp and the eviction victim is always
// unique. Eviction only forgets; the next request for a forgotten entry is a
// miss and re-emits its bytes, which is always safe.
//
// Eviction scans for the smallest stamp, O(n) in the number of entries.

use std::num::NonZeroUsize;

use rustc_hash::{FxBuildHasher, FxHashMap};
use tracing::trace;

use crate::category::{Category, CategorySet, StateValue};
use crate::stream::StreamId;

/// Key of one cache entry.
pub type CacheKey = (StreamId, Category);

#[derive(Debug, Clone, Copy)]
struct Entry {
    value: StateValue,
    stamp: u64,
}

/// Bounded LRU table of the formatting state last applied to each stream.
#[derive(Debug)]
pub struct StateCache {
    map: FxHashMap<CacheKey, Entry>,
    capacity: NonZeroUsize,
    clock: u64,
}

impl StateCache {
    /// Create an empty cache holding at most `capacity` entries in total.
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            map: FxHashMap::with_capacity_and_hasher(capacity.get(), FxBuildHasher),
            capacity,
            clock: 0,
        }
    }

    /// The cached value for `(stream, category)`, marking it most recently used.
    pub fn lookup(&mut self, stream: StreamId, category: Category) -> Option<StateValue> {
        let entry = self.map.get_mut(&(stream, category))?;
        self.clock += 1;
        entry.stamp = self.clock;
        Some(entry.value)
    }

    /// The cached value without touching recency.
    #[must_use]
    pub fn peek(&self, stream: StreamId, category: Category) -> Option<StateValue> {
        self.map.get(&(stream, category)).map(|e| e.value)
    }

    /// Whether an entry exists, without touching recency.
    #[must_use]
    pub fn contains(&self, stream: StreamId, category: Category) -> bool {
        self.map.contains_key(&(stream, category))
    }

    /// Insert or replace an entry and mark it most recently used.
    ///
    /// If the insert would exceed capacity, the least recently used entry is
    /// evicted first and its key returned. Replacing an existing key never
    /// evicts.
    pub fn put(
        &mut self,
        stream: StreamId,
        category: Category,
        value: StateValue,
    ) -> Option<CacheKey> {
        self.clock += 1;
        let key = (stream, category);

        if let Some(entry) = self.map.get_mut(&key) {
            entry.value = value;
            entry.stamp = self.clock;
            return None;
        }

        let evicted = if self.map.len() >= self.capacity.get() {
            self.evict_lru()
        } else {
            None
        };

        self.map.insert(
            key,
            Entry {
                value,
                stamp: self.clock,
            },
        );
        evicted
    }

    fn evict_lru(&mut self) -> Option<CacheKey> {
        let key = self
            .map
            .iter()
            .min_by_key(|(_, entry)| entry.stamp)
            .map(|(key, _)| *key)?;
        self.map.remove(&key);
        trace!(stream = %key.0, category = ?key.1, "evicted least recently used entry");
        Some(key)
    }

    /// Forget one entry. No-op if absent; returns what was removed.
    pub fn invalidate(&mut self, stream: StreamId, category: Category) -> Option<StateValue> {
        self.map.remove(&(stream, category)).map(|e| e.value)
    }

    /// Forget every entry of `stream` whose category is in `set`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_set(&mut self, stream: StreamId, set: CategorySet) -> usize {
        let mut removed = 0;
        for category in set.categories() {
            if self.map.remove(&(stream, category)).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Forget every entry of `stream`. Returns the number removed.
    pub fn invalidate_all(&mut self, stream: StreamId) -> usize {
        let before = self.map.len();
        self.map.retain(|(s, _), _| *s != stream);
        before - self.map.len()
    }

    /// Forget everything, for every stream.
    pub fn clear(&mut self) {
        self.map.clear();
        self.clock = 0;
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Maximum number of live entries.
    #[must_use]
    pub const fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
