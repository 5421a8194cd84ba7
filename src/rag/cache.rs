//! Time-bounded response cache.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::model::ContextFragment;

/// Bounded LRU cache of generated responses with a fixed entry lifetime.
///
/// Expired entries are dropped lazily on lookup; when full, the least
/// recently used entry is evicted.
pub struct ResponseCache {
    entries: Mutex<LruCache<String, (String, Instant)>>,
    ttl: Duration,
}

impl ResponseCache {
    /// Create a cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Look up a live entry.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().ok()?;
        let expired = match entries.get(key) {
            Some((_, inserted)) => inserted.elapsed() >= self.ttl,
            None => return None,
        };
        if expired {
            entries.pop(key);
            return None;
        }
        entries.get(key).map(|(value, _)| value.clone())
    }

    /// Store an entry, replacing any previous value for `key`.
    pub fn insert(&self, key: String, value: String) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.put(key, (value, Instant::now()));
        }
    }

    /// Number of stored entries, including ones not yet found expired.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Check if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all entries.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("len", &self.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Cache key: the query, `::`, then the first `max_chars` characters of the
/// fragments' JSON form.
///
/// Different contexts sharing that prefix collide.
pub fn cache_key(query: &str, fragments: &[ContextFragment], max_chars: usize) -> String {
    let context = serde_json::to_string(fragments).unwrap_or_default();
    let prefix: String = context.chars().take(max_chars).collect();
    format!("{}::{}", query, prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let cache = ResponseCache::new(10, Duration::from_secs(60));
        assert!(cache.is_empty());
        cache.insert("q::[]".to_string(), "answer".to_string());
        assert_eq!(cache.get("q::[]").as_deref(), Some("answer"));
        assert_eq!(cache.get("other"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let cache = ResponseCache::new(10, Duration::ZERO);
        cache.insert("k".to_string(), "v".to_string());
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_lru_eviction() {
        let cache = ResponseCache::new(2, Duration::from_secs(60));
        cache.insert("a".to_string(), "1".to_string());
        cache.insert("b".to_string(), "2".to_string());
        assert!(cache.get("a").is_some());
        cache.insert("c".to_string(), "3".to_string());

        assert_eq!(cache.get("b"), None);
        assert!(cache.get("a").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let cache = ResponseCache::new(0, Duration::from_secs(60));
        cache.insert("a".to_string(), "1".to_string());
        cache.insert("b".to_string(), "2".to_string());
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_key() {
        assert_eq!(cache_key("hello", &[], 100), "hello::[]");

        let fragments = vec![ContextFragment::Text {
            page: 1,
            content: "y".repeat(300),
        }];
        let key = cache_key("q", &fragments, 100);
        assert_eq!(key.chars().count(), "q::".len() + 100);
        assert!(key.starts_with(r#"q::[{"type":"text","page":1,"content":"yyy"#));
    }
}
