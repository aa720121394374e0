//! Error types.
//!
//! None of these ever reach a reader of the page: the resolver absorbs
//! them, logs them, and falls back to the default locale or the raw key.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::locale::Locale;

/// Failure while fetching or validating one locale's catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The source has no resource for this locale.
    #[error("no catalog available for locale '{locale}'")]
    NotFound { locale: Locale },

    /// The resource exists but could not be read.
    #[error("failed to read catalog for '{locale}' from {}", path.display())]
    Io {
        locale: Locale,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The resource is not valid JSON.
    #[error("catalog for '{locale}' is not valid JSON")]
    Parse {
        locale: Locale,
        #[source]
        source: serde_json::Error,
    },

    /// Valid JSON, but not a tree of objects and strings.
    #[error("catalog for '{locale}' has a {found} at '{path}', expected a string or an object")]
    Malformed {
        locale: Locale,
        path: String,
        found: &'static str,
    },
}

impl CatalogError {
    /// Locale the failed load was for.
    pub fn locale(&self) -> &Locale {
        match self {
            Self::NotFound { locale }
            | Self::Io { locale, .. }
            | Self::Parse { locale, .. }
            | Self::Malformed { locale, .. } => locale,
        }
    }
}

/// A locale switch where neither the requested nor the default catalog
/// could be loaded.
#[derive(Debug, Error)]
pub enum SwitchError {
    #[error("locale '{requested}' is unavailable and default locale '{default}' failed to load")]
    Unavailable {
        requested: Locale,
        default: Locale,
        #[source]
        source: Arc<CatalogError>,
    },
}

/// Invalid locale configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("at least one supported locale is required")]
    NoLocales,

    #[error("default locale '{0}' is not in the supported locale list")]
    DefaultNotSupported(String),

    #[error("invalid locale identifier '{0}'")]
    InvalidLocale(String),
}

/// Failure reading or writing the persisted preference.
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("failed to access preference file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("preference file {} is corrupt", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
