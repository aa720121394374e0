//! Typed cache wrapper around Moka.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

use moka::sync::Cache;

use super::CacheConfig;

/// A typed cache wrapper that provides a clean API over Moka.
pub struct TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Cache<K, V>,
    name: Arc<str>,
}

impl<K, V> TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a new typed cache with the given name and config.
    pub fn new(name: impl Into<Arc<str>>, config: CacheConfig) -> Self {
        Self {
            inner: Cache::builder().max_capacity(config.max_capacity).build(),
            name: name.into(),
        }
    }

    /// Insert a key-value pair into the cache.
    pub fn insert(&self, key: K, value: V) {
        self.inner.insert(key, value);
    }

    /// Get a value from the cache.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.get(key)
    }

    /// Check if a key exists in the cache.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.contains_key(key)
    }

    /// Number of entries.
    ///
    /// Note: Moka updates this lazily, so pending work is flushed first.
    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}

impl<K, V> std::fmt::Debug for TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedCache")
            .field("name", &self.name)
            .field("entry_count", &self.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get_by_borrowed_key() {
        let cache: TypedCache<String, u32> = TypedCache::new("test", CacheConfig::catalogs(2));
        cache.insert("en".to_string(), 1);

        assert_eq!(cache.get("en"), Some(1));
        assert!(cache.contains("en"));
        assert!(!cache.contains("es"));
        assert_eq!(cache.entry_count(), 1);
    }

    #[test]
    fn test_full_cache_keeps_every_slot() {
        let cache: TypedCache<String, u32> = TypedCache::new("catalogs", CacheConfig::catalogs(3));
        for (i, locale) in ["en", "pt-BR", "es"].into_iter().enumerate() {
            cache.insert(locale.to_string(), i as u32);
        }

        assert_eq!(cache.entry_count(), 3);
        assert_eq!(cache.get("en"), Some(0));
        assert_eq!(cache.get("es"), Some(2));
        assert!(format!("{cache:?}").contains("catalogs"));
    }
}
