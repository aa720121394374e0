//! Configuration module for sitelingo.
//!
//! Loads configuration from environment variables.

use std::env;
use std::path::PathBuf;

use url::Url;

use crate::error::ConfigError;
use crate::locale::{SupportedLocales, normalize_posix_locale};

const DEFAULT_CATALOG_DIR: &str = "data/translations";
const DEFAULT_LOCALES: &str = "en,pt-BR,es";
const DEFAULT_LOCALE: &str = "en";
const DEFAULT_PREFERENCES: &str = ".sitelingo/preferences.json";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding one `<locale>.json` catalog per locale.
    pub catalog_dir: PathBuf,

    /// Supported locale tags (comma-separated in the environment).
    pub locales: Vec<String>,

    /// Fallback locale; must be one of `locales`.
    pub default_locale: String,

    /// JSON file the selected locale is persisted in.
    pub preferences_path: PathBuf,

    /// Page URL used for alternate links and `?lang=` detection.
    pub base_url: Option<Url>,

    /// Environment locale as a language tag (from `LC_ALL` or `LANG`).
    pub environment_locale: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_dir: PathBuf::from(DEFAULT_CATALOG_DIR),
            locales: split_list(DEFAULT_LOCALES),
            default_locale: DEFAULT_LOCALE.to_string(),
            preferences_path: PathBuf::from(DEFAULT_PREFERENCES),
            base_url: None,
            environment_locale: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable is optional. An unparsable `SITELINGO_BASE_URL` is
    /// ignored with a warning.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`Config::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let base_url = var("SITELINGO_BASE_URL").and_then(|raw| match Url::parse(&raw) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!("Ignoring invalid SITELINGO_BASE_URL '{}': {}", raw, e);
                None
            }
        });

        // LC_ALL overrides LANG, as in POSIX.
        let environment_locale = var("LC_ALL")
            .or_else(|| var("LANG"))
            .and_then(|raw| normalize_posix_locale(&raw));

        Self {
            catalog_dir: var("SITELINGO_CATALOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.catalog_dir),
            locales: var("SITELINGO_LOCALES")
                .map(|raw| split_list(&raw))
                .unwrap_or(defaults.locales),
            default_locale: var("SITELINGO_DEFAULT_LOCALE").unwrap_or(defaults.default_locale),
            preferences_path: var("SITELINGO_PREFERENCES")
                .map(PathBuf::from)
                .unwrap_or(defaults.preferences_path),
            base_url,
            environment_locale,
        }
    }

    /// Validate the locale settings.
    pub fn supported_locales(&self) -> Result<SupportedLocales, ConfigError> {
        SupportedLocales::new(self.locales.iter().cloned(), self.default_locale.clone())
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config, Config::default());
        assert_eq!(config.locales, vec!["en", "pt-BR", "es"]);
        assert!(config.supported_locales().is_ok());
    }

    #[test]
    fn test_reads_variables() {
        let config = Config::from_lookup(lookup(&[
            ("SITELINGO_CATALOG_DIR", "/srv/i18n"),
            ("SITELINGO_LOCALES", " en , pt , "),
            ("SITELINGO_DEFAULT_LOCALE", "pt"),
            ("SITELINGO_BASE_URL", "https://blog.example/post"),
            ("LANG", "pt_BR.UTF-8"),
        ]));

        assert_eq!(config.catalog_dir, PathBuf::from("/srv/i18n"));
        assert_eq!(config.locales, vec!["en", "pt"]);
        assert_eq!(config.default_locale, "pt");
        assert_eq!(
            config.base_url.as_ref().map(Url::as_str),
            Some("https://blog.example/post")
        );
        assert_eq!(config.environment_locale.as_deref(), Some("pt-BR"));
    }

    #[test]
    fn test_lc_all_overrides_lang_and_bad_url_is_dropped() {
        let config = Config::from_lookup(lookup(&[
            ("LC_ALL", "es_ES.UTF-8"),
            ("LANG", "en_US.UTF-8"),
            ("SITELINGO_BASE_URL", "not a url"),
        ]));
        assert_eq!(config.environment_locale.as_deref(), Some("es-ES"));
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_invalid_default_is_reported() {
        let config = Config::from_lookup(lookup(&[("SITELINGO_DEFAULT_LOCALE", "fr")]));
        assert_eq!(
            config.supported_locales(),
            Err(ConfigError::DefaultNotSupported("fr".to_string()))
        );
    }
}
