use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

use crate::model::{normalize_for_search, EntityType, SearchResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Normalized query plus the sorted set of types that went to the server.
    pub fn new(query: &str, types: &[EntityType]) -> Self {
        let mut sorted: Vec<&str> = types.iter().map(|t| t.as_str()).collect();
        sorted.sort_unstable();
        sorted.dedup();
        Self(format!("{}::{}", normalize_for_search(query), sorted.join(",")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct ResultCache {
    cache: Cache<CacheKey, Arc<Vec<SearchResult>>>,
}

impl ResultCache {
    pub fn new(max_entries: u64, ttl: Option<Duration>) -> Self {
        let max_capacity = max_entries.max(1);
        let mut builder = Cache::builder().max_capacity(max_capacity);
        if let Some(ttl) = ttl {
            builder = builder.time_to_live(ttl);
        }
        Self {
            cache: builder.build(),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<Vec<SearchResult>> {
        self.cache.get(key).map(|results| results.as_ref().clone())
    }

    pub fn put(&self, key: CacheKey, results: Vec<SearchResult>) {
        self.cache.insert(key, Arc::new(results));
    }

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

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(100, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_ignores_type_order_and_accents() {
        let a = CacheKey::new("López", &[EntityType::Task, EntityType::Contact]);
        let b = CacheKey::new("lopez ", &[EntityType::Contact, EntityType::Task]);
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "lopez::contact,task");
    }

    #[test]
    fn key_differs_by_type_set() {
        let a = CacheKey::new("lopez", &[EntityType::Contact]);
        let b = CacheKey::new("lopez", &[EntityType::Contact, EntityType::Matter]);
        assert_ne!(a, b);
    }

    #[test]
    fn get_returns_what_was_put() {
        let cache = ResultCache::default();
        let key = CacheKey::new("perez", &[EntityType::Matter]);
        assert!(cache.get(&key).is_none());

        let results = vec![SearchResult::new("f1", EntityType::Matter, "Pérez c/ Gómez")];
        cache.put(key.clone(), results.clone());

        assert_eq!(cache.get(&key), Some(results));
    }

    #[test]
    fn evicts_beyond_capacity() {
        let cache = ResultCache::new(2, None);
        for query in ["uno", "dos", "tres", "cuatro"] {
            cache.put(CacheKey::new(query, &[EntityType::Task]), Vec::new());
        }

        assert!(cache.len() <= 2);
    }

    #[test]
    fn clear_drops_every_entry() {
        let cache = ResultCache::default();
        cache.put(CacheKey::new("perez", &[EntityType::Contact]), Vec::new());
        assert_eq!(cache.len(), 1);

        cache.clear();

        assert!(cache.is_empty());
    }
}
