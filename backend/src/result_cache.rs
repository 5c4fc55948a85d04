//! Result Cache
//!
//! Memoizes engine responses per (compiled query text, page, page size).
//! Two query strings never share an entry, even when they mean the same
//! thing: the key is the compiler's output, byte for byte.
//!
//! Entries expire after a fixed TTL. Expiry is lazy: an entry older than the
//! TTL is dropped when it is read, or when [`ResultCache::evict_expired`]
//! runs. There is no size bound; a cache lives as long as one search session.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use common::search_query::SearchRequest;
use tracing::debug;

#[derive(Clone, Debug)]
struct CacheEntry<V> {
    payload: V,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResultCacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries dropped because they outlived the TTL
    pub expired: u64,
    pub entry_count: usize,
}

#[derive(Debug, Clone)]
pub struct ResultCache<V> {
    entries: HashMap<SearchRequest, CacheEntry<V>>,
    ttl: TimeDelta,
    hits: u64,
    misses: u64,
    expired: u64,
}

/// Short, log-friendly name for a cache key.
pub fn key_digest(key: &SearchRequest) -> String {
    let digest = sha256::digest(format!("{}\n{}\n{}", key.query_text, key.page, key.page_size));
    digest[..12].to_string()
}

impl<V: Clone> ResultCache<V> {
    pub fn new(ttl: TimeDelta) -> Self {
        Self { entries: HashMap::new(), ttl, hits: 0, misses: 0, expired: 0 }
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    fn is_expired(&self, entry: &CacheEntry<V>, now: DateTime<Utc>) -> bool {
        now - entry.created_at > self.ttl
    }

    /// Returns the cached payload, or `None` on a miss. A stale entry counts as a miss and is removed.
    pub fn get(&mut self, key: &SearchRequest, now: DateTime<Utc>) -> Option<V> {
        let Some(entry) = self.entries.get(key) else {
            self.misses += 1;
            debug!("result cache miss: {}", key_digest(key));
            return None;
        };
        if self.is_expired(entry, now) {
            self.entries.remove(key);
            self.expired += 1;
            self.misses += 1;
            debug!("result cache expired: {}", key_digest(key));
            return None;
        }
        self.hits += 1;
        debug!("result cache hit: {}", key_digest(key));
        Some(entry.payload.clone())
    }

    pub fn put(&mut self, key: SearchRequest, payload: V, now: DateTime<Utc>) {
        debug!("result cache insert: {}", key_digest(&key));
        self.entries.insert(key, CacheEntry { payload, created_at: now });
    }

    /// Drops every entry older than the TTL, returning how many went.
    pub fn evict_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, entry| now - entry.created_at <= ttl);
        let evicted = before - self.entries.len();
        self.expired += evicted as u64;
        evicted
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys currently stored, expired or not.
    pub fn keys(&self) -> impl Iterator<Item = &SearchRequest> {
        self.entries.keys()
    }

    pub fn contains_key(&self, key: &SearchRequest) -> bool {
        self.entries.contains_key(key)
    }

    pub fn stats(&self) -> ResultCacheStats {
        ResultCacheStats {
            hits: self.hits,
            misses: self.misses,
            expired: self.expired,
            entry_count: self.entries.len(),
        }
    }
}


#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn key(query: &str, page: u64) -> SearchRequest {
        SearchRequest { query_text: query.to_string(), page, page_size: 10 }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn hit_within_ttl() {
        let mut cache = ResultCache::new(TimeDelta::minutes(5));
        cache.put(key("*:*", 1), "page one", t0());
        assert_eq!(cache.get(&key("*:*", 1), t0() + TimeDelta::minutes(5)), Some("page one"));
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn expired_entry_is_a_miss_and_is_gone() {
        let mut cache = ResultCache::new(TimeDelta::minutes(5));
        cache.put(key("*:*", 1), "page one", t0());
        let later = t0() + TimeDelta::minutes(5) + TimeDelta::seconds(1);
        assert_eq!(cache.get(&key("*:*", 1), later), None);
        assert_eq!(cache.keys().count(), 0);
        assert!(cache.is_empty());
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.expired), (0, 1, 1));
    }

    #[test]
    fn keys_differ_by_text_page_and_size() {
        let mut cache = ResultCache::new(TimeDelta::minutes(5));
        cache.put(key("a b", 1), 1, t0());
        cache.put(key("a b", 2), 2, t0());
        cache.put(SearchRequest { query_text: "a b".to_string(), page: 1, page_size: 20 }, 3, t0());
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get(&key("b a", 1), t0()), None);
        assert_eq!(cache.get(&key("a  b", 1), t0()), None);
        assert_eq!(cache.get(&key("a b", 2), t0()), Some(2));
    }

    #[test]
    fn put_overwrites_and_restarts_the_clock() {
        let mut cache = ResultCache::new(TimeDelta::minutes(5));
        cache.put(key("q", 1), "old", t0());
        cache.put(key("q", 1), "new", t0() + TimeDelta::minutes(4));
        assert_eq!(cache.get(&key("q", 1), t0() + TimeDelta::minutes(8)), Some("new"));
    }

    #[test]
    fn evict_expired_sweeps_only_stale_entries() {
        let mut cache = ResultCache::new(TimeDelta::minutes(5));
        cache.put(key("old", 1), 1, t0());
        cache.put(key("fresh", 1), 2, t0() + TimeDelta::minutes(3));
        assert_eq!(cache.evict_expired(t0() + TimeDelta::minutes(6)), 1);
        assert!(cache.contains_key(&key("fresh", 1)));
        assert!(!cache.contains_key(&key("old", 1)));
        cache.clear();
        assert_eq!(cache.stats().entry_count, 0);
    }

    #[test]
    fn digest_is_stable_and_short() {
        assert_eq!(key_digest(&key("q", 1)), key_digest(&key("q", 1)));
        assert_ne!(key_digest(&key("q", 1)), key_digest(&key("q", 2)));
        assert_eq!(key_digest(&key("q", 1)).len(), 12);
    }
}
