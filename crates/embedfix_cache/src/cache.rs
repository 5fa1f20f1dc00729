//! TTL cache implementation.

use derive_getters::Getters;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Cache entry with value and fetch timestamp.
#[derive(Debug, Clone, Getters)]
pub struct CacheEntry<V> {
    value: V,
    fetched_at: Instant,
}

impl<V> CacheEntry<V> {
    /// Check if this entry is older than `ttl`.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() > ttl
    }
}

/// Cache mapping keys to values with a fixed freshness window.
///
/// Expired entries are dropped on read. Staleness is bounded by the TTL;
/// concurrent writers racing on the same key get last-writer-wins, which is
/// acceptable for configuration data.
///
/// # Example
///
/// ```
/// use embedfix_cache::TtlCache;
/// use std::time::Duration;
///
/// let mut cache: TtlCache<i64, String> = TtlCache::new(Duration::from_secs(60));
/// cache.insert(42, "settings".to_string());
/// assert_eq!(cache.get(&42), Some(&"settings".to_string()));
/// ```
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, CacheEntry<V>>,
}

impl<K: Eq + Hash, V> TtlCache<K, V> {
    /// Create a cache with the given freshness window.
    pub fn new(ttl: Duration) -> Self {
        tracing::debug!(ttl = ?ttl, "Creating TtlCache");
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Insert a value, replacing any previous entry for the key.
    pub fn insert(&mut self, key: K, value: V) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Get a fresh value, dropping the entry if it has expired.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let expired = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired(self.ttl));
        if expired {
            tracing::debug!("Cache entry expired, removing");
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|entry| &entry.value)
    }

    /// Remove a single entry, forcing the next read to refetch.
    pub fn invalidate(&mut self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        tracing::info!(cleared = count, "Cleared cache");
    }

    /// Remove expired entries.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, entry| !entry.is_expired(ttl));
        before - self.entries.len()
    }

    /// Number of entries, including any not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The configured freshness window.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
