//! Translation resolver.
//!
//! Owns the supported locales, the loaded catalogs and the active locale.
//! Lookups are synchronous and never fail; switching locale is the only
//! async operation because it may have to fetch a catalog.
//!
//! ## Fallback
//!
//! `resolve` walks the requested locale's catalog first, then the default
//! locale's catalog, and finally returns the key path itself. A key that
//! is missing everywhere is logged once and counted, see
//! [`TranslationResolver::missing_keys`].
//!
//! ## Loading
//!
//! Catalogs are fetched on first use and kept for the resolver's
//! lifetime. Requests for a locale that is already being fetched wait on
//! the same fetch.

mod listener;
mod placeholder;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::cache::{CacheConfig, TypedCache};
use crate::catalog::{Catalog, CatalogSource};
use crate::dom::{self, Element, SyncReport};
use crate::error::{CatalogError, SwitchError};
use crate::locale::{DetectionInputs, Locale, SupportedLocales, detect_locale};
use crate::preference::{LANGUAGE_KEY, PreferenceStore};

pub use listener::{LocaleEvent, LocaleListener, SubscriptionId};
pub use placeholder::substitute;

use listener::Listeners;

type LoadResult = Result<Arc<Catalog>, Arc<CatalogError>>;
type PendingLoad = Shared<BoxFuture<'static, LoadResult>>;

/// Result of a successful `set_active_locale` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// `locale` is now active. `fell_back` is set when it is the default
    /// locale standing in for an unsupported or unloadable request.
    Applied { locale: Locale, fell_back: bool },
    /// A newer switch was committed first; this one changed nothing.
    Superseded { locale: Locale },
}

impl SwitchOutcome {
    pub fn locale(&self) -> &Locale {
        match self {
            Self::Applied { locale, .. } | Self::Superseded { locale } => locale,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// A key that resolved to its own path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingKey {
    pub key_path: String,
    pub locale: Locale,
    pub hits: u64,
}

pub struct TranslationResolver {
    supported: SupportedLocales,
    source: Arc<dyn CatalogSource>,
    preferences: Arc<dyn PreferenceStore>,
    catalogs: TypedCache<Locale, Arc<Catalog>>,
    pending: DashMap<Locale, PendingLoad>,
    active: RwLock<Locale>,
    /// Last ticket handed to a switch request.
    issued: AtomicU64,
    /// Ticket of the last switch that was applied.
    committed: Mutex<u64>,
    /// Ticket of the last switch written to the preference store.
    persisted: tokio::sync::Mutex<u64>,
    listeners: Listeners,
    missing: DashMap<(String, Locale), u64>,
}

impl TranslationResolver {
    /// Create a resolver. The default locale is active until the first
    /// switch, but nothing is loaded yet.
    pub fn new(
        supported: SupportedLocales,
        source: Arc<dyn CatalogSource>,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Self {
        let catalogs = TypedCache::new("catalogs", CacheConfig::catalogs(supported.len()));
        let active = RwLock::new(supported.default_locale().clone());

        Self {
            supported,
            source,
            preferences,
            catalogs,
            pending: DashMap::new(),
            active,
            issued: AtomicU64::new(0),
            committed: Mutex::new(0),
            persisted: tokio::sync::Mutex::new(0),
            listeners: Listeners::default(),
            missing: DashMap::new(),
        }
    }

    pub fn supported_locales(&self) -> &SupportedLocales {
        &self.supported
    }

    pub fn default_locale(&self) -> &Locale {
        self.supported.default_locale()
    }

    pub fn active_locale(&self) -> Locale {
        self.active.read().clone()
    }

    pub fn is_supported(&self, locale: &str) -> bool {
        self.supported.contains(locale)
    }

    pub fn is_loaded(&self, locale: &str) -> bool {
        self.catalogs.contains(locale)
    }

    /// Catalog of the active locale; empty if it has not been loaded.
    pub fn active_catalog(&self) -> Arc<Catalog> {
        let active = self.active_locale();
        self.catalogs.get(&active).unwrap_or_default()
    }

    /// Provide a catalog up front instead of fetching it.
    ///
    /// Returns `false` (and stores nothing) for an unsupported locale.
    pub fn preload(&self, locale: &str, catalog: Catalog) -> bool {
        let Some(locale) = self.supported.find(locale) else {
            warn!("Ignoring preloaded catalog for unsupported locale {}", locale);
            return false;
        };
        debug!("Preloaded catalog {} ({} keys)", locale, catalog.len());
        self.catalogs.insert(locale.clone(), Arc::new(catalog));
        true
    }

    /// Load a supported locale's catalog, joining a fetch already in
    /// progress.
    ///
    /// Unsupported locales are never fetched and report `NotFound`.
    /// Failures are not cached; the next call fetches again.
    pub async fn load(&self, locale: &Locale) -> LoadResult {
        let Some(locale) = self.supported.find(locale.as_str()) else {
            warn!("Refusing to load catalog for unsupported locale {}", locale);
            return Err(Arc::new(CatalogError::NotFound {
                locale: locale.clone(),
            }));
        };

        if let Some(catalog) = self.catalogs.get(locale) {
            return Ok(catalog);
        }

        let pending = match self.pending.entry(locale.clone()) {
            Entry::Occupied(entry) => {
                debug!("Joining in-flight load of {}", locale);
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                // A load may have finished between the cache check and here.
                if let Some(catalog) = self.catalogs.get(locale) {
                    return Ok(catalog);
                }
                let load = fetch_catalog(Arc::clone(&self.source), locale.clone())
                    .boxed()
                    .shared();
                entry.insert(load.clone());
                load
            }
        };

        let result = pending.clone().await;

        if let Ok(catalog) = &result
            && !self.catalogs.contains(locale)
        {
            info!("Loaded catalog {} ({} keys)", locale, catalog.len());
            self.catalogs.insert(locale.clone(), Arc::clone(catalog));
        }
        self.pending
            .remove_if(locale, |_, current| current.ptr_eq(&pending));

        result
    }

    /// Translate `key_path` for `locale`, falling back to the default
    /// locale and then to the key path itself.
    pub fn resolve(&self, key_path: &str, locale: &str, replacements: &[(&str, &str)]) -> String {
        match self.lookup(key_path, locale) {
            Some(template) => substitute(&template, replacements),
            None => {
                self.record_missing(key_path, locale);
                key_path.to_string()
            }
        }
    }

    /// `resolve` against the active locale.
    pub fn translate(&self, key_path: &str, replacements: &[(&str, &str)]) -> String {
        let active = self.active_locale();
        self.resolve(key_path, active.as_str(), replacements)
    }

    /// `translate` without replacements.
    pub fn t(&self, key_path: &str) -> String {
        self.translate(key_path, &[])
    }

    /// Like `translate`, but `None` when the key is missing, without
    /// counting it as a missing translation.
    pub fn try_translate(&self, key_path: &str, replacements: &[(&str, &str)]) -> Option<String> {
        let active = self.active_locale();
        self.lookup(key_path, active.as_str())
            .map(|template| substitute(&template, replacements))
    }

    fn lookup(&self, key_path: &str, locale: &str) -> Option<String> {
        let requested = self.supported.find(locale);

        if let Some(text) = requested
            .and_then(|l| self.catalogs.get(l))
            .and_then(|catalog| catalog.text(key_path).map(str::to_string))
        {
            return Some(text);
        }

        let default = self.supported.default_locale();
        if requested == Some(default) {
            return None;
        }

        let text = self
            .catalogs
            .get(default)
            .and_then(|catalog| catalog.text(key_path).map(str::to_string));
        if text.is_some() {
            debug!("Key '{}' not found for {}, using {}", key_path, locale, default);
        }
        text
    }

    fn record_missing(&self, key_path: &str, locale: &str) {
        let locale = self.supported.find(locale).cloned().unwrap_or_else(|| Locale::new(locale));
        let mut hits = self.missing.entry((key_path.to_string(), locale.clone())).or_insert(0);
        *hits += 1;
        if *hits == 1 {
            warn!("Translation key '{}' not found for {}", key_path, locale);
        }
    }

    /// Every key that fell through to its own path so far, sorted by key.
    pub fn missing_keys(&self) -> Vec<MissingKey> {
        let mut keys: Vec<MissingKey> = self
            .missing
            .iter()
            .map(|entry| {
                let (key_path, locale) = entry.key();
                MissingKey {
                    key_path: key_path.clone(),
                    locale: locale.clone(),
                    hits: *entry.value(),
                }
            })
            .collect();
        keys.sort_by(|a, b| (&a.key_path, &a.locale).cmp(&(&b.key_path, &b.locale)));
        keys
    }

    /// Switch the active locale.
    ///
    /// Unsupported locales become the default locale. If the catalog
    /// cannot be loaded the default locale is used instead; only when that
    /// fails too is an error returned, and the active locale is unchanged.
    pub async fn set_active_locale(&self, requested: &str) -> Result<SwitchOutcome, SwitchError> {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let default = self.supported.default_locale().clone();

        let (target, substituted) = match self.supported.find(requested) {
            Some(locale) => (locale.clone(), false),
            None => {
                warn!("Locale {} not supported, falling back to {}", requested, default);
                (default.clone(), true)
            }
        };

        let (locale, catalog, fell_back) = match self.load(&target).await {
            Ok(catalog) => (target, catalog, substituted),
            Err(e) if target != default => {
                warn!("Failed to load {}: {}; falling back to {}", target, e, default);
                match self.load(&default).await {
                    Ok(catalog) => (default.clone(), catalog, true),
                    Err(source) => {
                        error!("Default locale {} failed to load: {}", default, source);
                        return Err(SwitchError::Unavailable {
                            requested: target,
                            default,
                            source,
                        });
                    }
                }
            }
            Err(source) => {
                error!("Default locale {} failed to load: {}", default, source);
                return Err(SwitchError::Unavailable {
                    requested: target,
                    default,
                    source,
                });
            }
        };

        // Key-level fallback needs the default catalog too.
        if locale != default
            && let Err(e) = self.load(&default).await
        {
            warn!("Default locale {} unavailable for fallback: {}", default, e);
        }

        {
            let mut committed = self.committed.lock();
            if ticket < *committed {
                debug!("Switch to {} superseded by a newer request", locale);
                return Ok(SwitchOutcome::Superseded { locale });
            }
            *committed = ticket;
            *self.active.write() = locale.clone();

            info!("Active locale is now {}", locale);
            self.listeners.notify(&LocaleEvent::Changed {
                locale: locale.clone(),
                catalog,
            });
        }

        self.persist(ticket, &locale).await;

        Ok(SwitchOutcome::Applied { locale, fell_back })
    }

    /// Write the committed locale to the preference store on a blocking
    /// thread. A write for an older ticket than the last one written is
    /// skipped, so the store always ends on the newest choice.
    async fn persist(&self, ticket: u64, locale: &Locale) {
        let mut persisted = self.persisted.lock().await;
        if ticket < *persisted {
            debug!("Not persisting {}: a newer choice was already saved", locale);
            return;
        }
        *persisted = ticket;

        let store = Arc::clone(&self.preferences);
        let value = locale.to_string();
        match tokio::task::spawn_blocking(move || store.set(LANGUAGE_KEY, &value)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to persist locale {}: {}", locale, e),
            Err(e) => warn!("Preference write for {} did not finish: {}", locale, e),
        }
    }

    /// Pick the starting locale (query, stored preference, environment,
    /// default), switch to it and announce readiness.
    ///
    /// `inputs.stored` is filled from the preference store when empty.
    pub async fn initialize(&self, inputs: &DetectionInputs) -> Result<Locale, SwitchError> {
        let mut inputs = inputs.clone();
        if inputs.stored.is_none() {
            inputs.stored = match self.preferences.get(LANGUAGE_KEY) {
                Ok(stored) => stored,
                Err(e) => {
                    warn!("Ignoring stored locale preference: {}", e);
                    None
                }
            };
        }

        let (detected, source) = detect_locale(&self.supported, &inputs);
        info!("Detected locale {} ({:?})", detected, source);

        self.set_active_locale(detected.as_str()).await?;

        let locale = self.active_locale();
        self.listeners.notify(&LocaleEvent::Ready {
            locale: locale.clone(),
        });
        Ok(locale)
    }

    /// Translate every annotated element under `root` into the active
    /// locale.
    pub fn synchronize_dom(&self, root: &mut Element) -> SyncReport {
        let active = self.active_locale();
        let report = dom::synchronize(root, |key| self.resolve(key, active.as_str(), &[]));
        debug!(
            "Synchronized {} elements for {} ({} updated)",
            report.annotated, active, report.updated
        );
        report
    }

    /// Register a listener for locale events.
    pub fn subscribe(&self, listener: Arc<dyn LocaleListener>) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    /// Returns `true` if the listener was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

async fn fetch_catalog(source: Arc<dyn CatalogSource>, locale: Locale) -> LoadResult {
    let raw = source.fetch(&locale).await.map_err(Arc::new)?;
    let catalog = Catalog::from_json_str(&locale, &raw).map_err(Arc::new)?;
    Ok(Arc::new(catalog))
}

impl fmt::Debug for TranslationResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationResolver")
            .field("supported", &self.supported)
            .field("active", &*self.active.read())
            .field("catalogs", &self.catalogs)
            .field("pending", &self.pending.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
