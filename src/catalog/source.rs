//! Where catalog text comes from.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::error::CatalogError;
use crate::locale::Locale;

/// Fetches the raw text of one locale's catalog.
///
/// Parsing and validation happen in the resolver, so a source only has
/// to report whether the text could be retrieved.
#[async_trait]
pub trait CatalogSource: Send + Sync + 'static {
    async fn fetch(&self, locale: &Locale) -> Result<String, CatalogError>;
}

/// One `<locale>.json` file per locale under a base directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    base_dir: PathBuf,
}

impl DirectorySource {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// File a locale's catalog is read from.
    pub fn path_for(&self, locale: &Locale) -> PathBuf {
        self.base_dir.join(format!("{locale}.json"))
    }
}

#[async_trait]
impl CatalogSource for DirectorySource {
    async fn fetch(&self, locale: &Locale) -> Result<String, CatalogError> {
        let path = self.path_for(locale);
        debug!("Reading catalog {}", path.display());

        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => Ok(raw),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(CatalogError::NotFound {
                locale: locale.clone(),
            }),
            Err(source) => Err(CatalogError::Io {
                locale: locale.clone(),
                path,
                source,
            }),
        }
    }
}

/// Catalog text held in memory, e.g. embedded with `include_str!`.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    entries: HashMap<Locale, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a locale's raw catalog text (builder pattern).
    #[must_use]
    pub fn with(mut self, locale: impl Into<Locale>, raw: impl Into<String>) -> Self {
        self.insert(locale, raw);
        self
    }

    pub fn insert(&mut self, locale: impl Into<Locale>, raw: impl Into<String>) {
        self.entries.insert(locale.into(), raw.into());
    }
}

#[async_trait]
impl CatalogSource for StaticSource {
    async fn fetch(&self, locale: &Locale) -> Result<String, CatalogError> {
        self.entries
            .get(locale)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound {
                locale: locale.clone(),
            })
    }
}
