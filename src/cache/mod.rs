//! Cache module - typed caching over Moka.
//!
//! The resolver keeps every successfully loaded catalog here for the
//! lifetime of the resolver. Loads still in progress are tracked by the
//! resolver itself; this cache only ever holds finished catalogs.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let catalogs: TypedCache<Locale, Arc<Catalog>> =
//!     TypedCache::new("catalogs", CacheConfig::catalogs(supported.len()));
//!
//! catalogs.insert(locale.clone(), Arc::new(catalog));
//! let catalog = catalogs.get(&locale);
//! ```

mod config;
mod typed;

pub use config::CacheConfig;
pub use typed::TypedCache;
