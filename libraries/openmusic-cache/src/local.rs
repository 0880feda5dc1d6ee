/// In-process fallback cache
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct LocalEntry {
    value: String,
    expires_at: Instant,
}

/// Bounded LRU map whose entries carry their own TTL
///
/// Shared process-wide. The lock is held only for the map operation itself,
/// never across an await.
pub struct LocalCache {
    entries: Mutex<LruCache<String, LocalEntry>>,
}

impl LocalCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Get a live value, evicting it if it has expired
    pub fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock();
        let now = Instant::now();

        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Some(entry.value.clone()),
            Some(_) => {
                entries.pop(key);
                None
            }
            None => None,
        }
    }

    pub fn set(&self, key: &str, value: &str, ttl: Duration) {
        let entry = LocalEntry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };
        self.entries.lock().put(key.to_string(), entry);
    }

    pub fn delete(&self, key: &str) {
        self.entries.lock().pop(key);
    }

    /// Number of stored entries, including expired ones not yet evicted
    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(capacity: usize) -> LocalCache {
        LocalCache::new(NonZeroUsize::new(capacity).unwrap())
    }

    #[tokio::test]
    async fn set_get_delete() {
        let local = cache(8);
        local.set("album:likes:1", "3", Duration::from_secs(60));
        assert_eq!(local.get("album:likes:1").as_deref(), Some("3"));

        local.delete("album:likes:1");
        assert_eq!(local.get("album:likes:1"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let local = cache(8);
        local.set("k", "v", Duration::from_secs(30));

        tokio::time::advance(Duration::from_secs(29)).await;
        assert_eq!(local.get("k").as_deref(), Some("v"));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(local.get("k"), None);
        assert!(local.is_empty());
    }

    #[tokio::test]
    async fn least_recently_used_entry_is_evicted() {
        let local = cache(2);
        local.set("a", "1", Duration::from_secs(60));
        local.set("b", "2", Duration::from_secs(60));
        assert!(local.get("a").is_some());

        local.set("c", "3", Duration::from_secs(60));

        assert_eq!(local.get("b"), None);
        assert_eq!(local.get("a").as_deref(), Some("1"));
        assert_eq!(local.len(), 2);
    }
}
