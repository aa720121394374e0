//! Cache configuration.

/// Configuration for a cache instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache.
    pub max_capacity: u64,
}

impl CacheConfig {
    /// Config for loaded catalogs: one slot per supported locale and no
    /// expiry, so a catalog stays loaded for as long as its resolver.
    pub fn catalogs(locale_count: usize) -> Self {
        Self {
            max_capacity: locale_count.max(1) as u64,
        }
    }
}
