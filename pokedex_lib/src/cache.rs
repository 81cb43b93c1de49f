//! In-memory cache with a freshness window and an eviction window, backed
//! by `DashMap` for concurrent access.

use dashmap::DashMap;
use std::time::{Duration, Instant};

/// A single cached value with the time it was stored.
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// Result of a cache lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<V> {
    /// Younger than the freshness window; use as-is.
    Fresh(V),
    /// Past the freshness window but not yet evicted; usable while a
    /// refetch happens.
    Stale(V),
    /// Never stored, or evicted.
    Miss,
}

/// Thread-safe in-memory cache with two time windows.
///
/// Entries older than `fresh_ttl` are reported as stale, and entries older
/// than `evict_ttl` are lazily removed on the next `get` for that key.
pub struct MemoryCache<V> {
    store: DashMap<String, CacheEntry<V>>,
    fresh_ttl: Duration,
    evict_ttl: Duration,
}

impl<V: Clone> MemoryCache<V> {
    /// Creates a new cache. An `evict_ttl` shorter than `fresh_ttl` is raised
    /// to `fresh_ttl`.
    pub fn new(fresh_ttl: Duration, evict_ttl: Duration) -> Self {
        Self {
            store: DashMap::new(),
            fresh_ttl,
            evict_ttl: evict_ttl.max(fresh_ttl),
        }
    }

    /// Looks up `key`, evicting it if it is past the eviction window.
    pub fn get(&self, key: &str) -> Lookup<V> {
        let Some(entry) = self.store.get(key) else {
            return Lookup::Miss;
        };
        let age = entry.stored_at.elapsed();
        if age > self.evict_ttl {
            drop(entry);
            self.store.remove(key);
            return Lookup::Miss;
        }
        if age > self.fresh_ttl {
            Lookup::Stale(entry.value.clone())
        } else {
            Lookup::Fresh(entry.value.clone())
        }
    }

    /// Inserts or overwrites a cache entry, restarting both windows.
    pub fn set(&self, key: String, value: V) {
        self.store.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }
}
