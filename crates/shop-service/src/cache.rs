//! Query result cache with a stale time.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use parking_lot::Mutex;
use shop_catalog::catalog::{CategoryRecord, ProductRecord};
use shop_catalog::search::{CatalogQuery, PaginatedResult};
use tokio::time::Instant;

/// How long a catalog page counts as fresh.
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(60);

/// How long the category list counts as fresh.
pub const CATEGORY_STALE_TIME: Duration = Duration::from_secs(5 * 60);

/// Cache for product listing pages keyed by query.
pub type ProductPageCache = QueryCache<CatalogQuery, PaginatedResult<ProductRecord>>;

/// Cache holding the single category list.
pub type CategoryListCache = QueryCache<(), Vec<CategoryRecord>>;

#[derive(Debug)]
struct Entry<V> {
    value: V,
    stored_at: Instant,
}

/// Keyed values that go stale after a fixed time.
///
/// Explicitly constructed and injected; nothing here is process-global.
#[derive(Debug)]
pub struct QueryCache<K, V> {
    stale_time: Duration,
    entries: Mutex<HashMap<K, Entry<V>>>,
}

impl<K: Eq + Hash + Clone, V: Clone> QueryCache<K, V> {
    /// Create a cache with the default stale time.
    pub fn new() -> Self {
        Self::with_stale_time(DEFAULT_STALE_TIME)
    }

    pub fn with_stale_time(stale_time: Duration) -> Self {
        Self {
            stale_time,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn stale_time(&self) -> Duration {
        self.stale_time
    }

    /// A fresh value for `key`. Stale entries are dropped on the way.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock();
        let fresh = entries
            .get(key)
            .map(|entry| entry.stored_at.elapsed() < self.stale_time)?;

        if fresh {
            entries.get(key).map(|entry| entry.value.clone())
        } else {
            entries.remove(key);
            None
        }
    }

    pub fn insert(&self, key: K, value: V) {
        self.entries.lock().insert(
            key,
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop one entry. Returns whether it was present.
    pub fn invalidate(&self, key: &K) -> bool {
        self.entries.lock().remove(key).is_some()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Default for QueryCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_goes_stale() {
        let cache: QueryCache<String, u32> = QueryCache::with_stale_time(Duration::from_secs(60));
        cache.insert("kit".to_string(), 2);
        assert_eq!(cache.get(&"kit".to_string()), Some(2));

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get(&"kit".to_string()), Some(2));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get(&"kit".to_string()), None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_invalidate_and_clear() {
        let cache: ProductPageCache = QueryCache::new();
        let q = CatalogQuery::new().with_search("kit");
        cache.insert(q.clone(), PaginatedResult::empty());
        cache.insert(CatalogQuery::default(), PaginatedResult::empty());
        assert_eq!(cache.len(), 2);

        assert!(cache.invalidate(&q));
        assert!(!cache.invalidate(&q));
        assert!(cache.get(&q).is_none());

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stale_time(), DEFAULT_STALE_TIME);
    }
}
