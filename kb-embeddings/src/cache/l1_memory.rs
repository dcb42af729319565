//! L1 in-memory cache using moka.

use std::time::Duration;

use moka::sync::Cache;

/// Embeddings keyed by the blake3 hash of the text that produced them.
pub struct L1MemoryCache {
    cache: Cache<String, Vec<f32>>,
}

impl L1MemoryCache {
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_idle(Duration::from_secs(3600))
            .time_to_live(Duration::from_secs(86400))
            .build();

        Self { cache }
    }

    pub fn get(&self, key: &str) -> Option<Vec<f32>> {
        self.cache.get(key)
    }

    pub fn insert(&self, key: String, embedding: Vec<f32>) {
        self.cache.insert(key, embedding);
    }

    /// Approximate; moka applies pending writes lazily.
    pub fn len(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let cache = L1MemoryCache::new(16);
        cache.insert("k".to_string(), vec![1.0, 2.0]);
        assert_eq!(cache.get("k"), Some(vec![1.0, 2.0]));
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn clear_drops_entries() {
        let cache = L1MemoryCache::new(16);
        cache.insert("a".to_string(), vec![1.0]);
        cache.clear();
        assert_eq!(cache.get("a"), None);
    }
}
