//! # TTL Lookup Cache
//!
//! In-memory key/value cache for reference data that changes rarely, e.g.
//! machine metadata keyed by machine id. Expired entries are evicted lazily
//! by the read that discovers them; there is no background sweep and no
//! capacity bound, since the usage pattern is one entry per distinct machine.
//!
//! Concurrent writers get last-write-wins semantics, which is acceptable
//! because writes are idempotent re-reads of the backing store.

use dashmap::DashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

pub struct TtlCache<K, V> {
    entries: DashMap<K, CacheEntry<V>>,
}

impl<K, V> std::fmt::Debug for TtlCache<K, V>
where
    K: Eq + Hash + std::fmt::Debug,
    V: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("entries", &self.entries)
            .finish()
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Look up a key, evicting it if its TTL has passed.
    pub fn get(&self, key: &K) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) if Instant::now() >= entry.expires_at => true,
            Some(entry) => return Some(entry.value.clone()),
            None => return None,
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }

    pub fn insert(&self, key: K, value: V, ttl: Duration) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    pub fn remove(&self, key: &K) {
        self.entries.remove(key);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of stored entries, including any not yet evicted by a read.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn fresh_entry_is_returned() {
        let cache: TtlCache<String, u32> = TtlCache::new();
        cache.insert("machine:1".to_string(), 42, Duration::from_secs(1));

        assert_eq!(cache.get(&"machine:1".to_string()), Some(42));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn expired_entry_is_a_miss_and_gets_evicted() {
        let cache: TtlCache<String, u32> = TtlCache::new();
        cache.insert("machine:1".to_string(), 42, Duration::from_millis(50));

        sleep(Duration::from_millis(80));

        assert_eq!(cache.get(&"machine:1".to_string()), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn missing_key_is_a_miss() {
        let cache: TtlCache<String, u32> = TtlCache::new();
        assert_eq!(cache.get(&"nope".to_string()), None);
    }

    #[test]
    fn remove_and_clear() {
        let cache: TtlCache<&'static str, u32> = TtlCache::new();
        cache.insert("a", 1, Duration::from_secs(60));
        cache.insert("b", 2, Duration::from_secs(60));

        cache.remove(&"a");
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn reinsert_overwrites_value_and_ttl() {
        let cache: TtlCache<&'static str, u32> = TtlCache::new();
        cache.insert("a", 1, Duration::from_millis(50));
        cache.insert("a", 2, Duration::from_secs(60));

        sleep(Duration::from_millis(80));
        assert_eq!(cache.get(&"a"), Some(2));
    }
}
