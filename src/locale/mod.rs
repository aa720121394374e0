//! Locale identifiers and the fixed set of locales a site supports.

mod detect;

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub use detect::{DetectionInputs, LocaleSource, detect_locale, normalize_posix_locale, query_lang};

/// A language tag such as `en`, `es` or `pt-BR`.
///
/// Tags compare case-sensitively as stored; use
/// [`SupportedLocales::find`] to match user input against the canonical
/// spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Language part of the tag, lowercased (`pt` for `pt-BR`).
    pub fn primary_subtag(&self) -> String {
        primary_subtag(&self.0)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Locale {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Locale {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for Locale {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

fn primary_subtag(tag: &str) -> String {
    tag.split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

fn is_valid_tag(tag: &str) -> bool {
    !tag.is_empty()
        && !tag.starts_with('-')
        && !tag.ends_with('-')
        && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Ordered set of supported locales plus the default one.
///
/// Always non-empty and always contains its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedLocales {
    locales: Vec<Locale>,
    default: Locale,
}

impl SupportedLocales {
    /// Build the set, dropping duplicates (ignoring ASCII case) and keeping
    /// first-seen order.
    pub fn new<I, S>(locales: I, default: impl Into<String>) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list: Vec<Locale> = Vec::new();
        for tag in locales {
            let tag = tag.into().trim().to_string();
            if !is_valid_tag(&tag) {
                return Err(ConfigError::InvalidLocale(tag));
            }
            // Tags differing only in case name the same locale; the first
            // spelling is canonical.
            if !list.iter().any(|l| l.as_str().eq_ignore_ascii_case(&tag)) {
                list.push(Locale(tag));
            }
        }

        if list.is_empty() {
            return Err(ConfigError::NoLocales);
        }

        let default = default.into().trim().to_string();
        let default = list
            .iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(&default))
            .cloned()
            .ok_or(ConfigError::DefaultNotSupported(default))?;

        Ok(Self {
            locales: list,
            default,
        })
    }

    pub fn default_locale(&self) -> &Locale {
        &self.default
    }

    pub fn iter(&self) -> impl Iterator<Item = &Locale> {
        self.locales.iter()
    }

    pub fn len(&self) -> usize {
        self.locales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }

    /// Exact (ASCII case-insensitive) match, returning the canonical tag.
    pub fn find(&self, tag: &str) -> Option<&Locale> {
        let tag = tag.trim();
        self.locales
            .iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(tag))
    }

    /// First supported locale sharing the primary language subtag.
    pub fn find_by_language(&self, tag: &str) -> Option<&Locale> {
        let wanted = primary_subtag(tag.trim());
        if wanted.is_empty() {
            return None;
        }
        self.locales.iter().find(|l| l.primary_subtag() == wanted)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.find(tag).is_some()
    }

    /// Canonical supported tag for `tag`, or the default.
    pub fn or_default(&self, tag: &str) -> &Locale {
        self.find(tag).unwrap_or(&self.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_must_be_supported() {
        assert_eq!(
            SupportedLocales::new(["en", "pt"], "fr"),
            Err(ConfigError::DefaultNotSupported("fr".to_string()))
        );
        assert_eq!(
            SupportedLocales::new(Vec::<String>::new(), "en"),
            Err(ConfigError::NoLocales)
        );
        assert_eq!(
            SupportedLocales::new(["en", "pt BR"], "en"),
            Err(ConfigError::InvalidLocale("pt BR".to_string()))
        );
    }

    #[test]
    fn test_duplicates_are_dropped() {
        let supported = SupportedLocales::new(["en", "es", "en"], "en").unwrap();
        assert_eq!(supported.len(), 2);
    }

    #[test]
    fn test_case_variants_merge_into_first_spelling() {
        let supported = SupportedLocales::new(["pt-BR", "en", "EN", "PT-br"], "En").unwrap();
        let tags: Vec<&str> = supported.iter().map(Locale::as_str).collect();
        assert_eq!(tags, vec!["pt-BR", "en"]);
        assert_eq!(supported.default_locale().as_str(), "en");
        assert_eq!(supported.find("EN").map(Locale::as_str), Some("en"));
    }

    #[test]
    fn test_find_is_case_insensitive_and_canonical() {
        let supported = SupportedLocales::new(["en", "pt-BR", "es"], "en").unwrap();
        assert_eq!(supported.find("pt-br").map(Locale::as_str), Some("pt-BR"));
        assert!(supported.find("pt").is_none());
        assert_eq!(supported.or_default("fr").as_str(), "en");
    }

    #[test]
    fn test_find_by_language() {
        let supported = SupportedLocales::new(["en", "pt-BR", "es"], "en").unwrap();
        assert_eq!(
            supported.find_by_language("pt-PT").map(Locale::as_str),
            Some("pt-BR")
        );
        assert_eq!(
            supported.find_by_language("es-MX").map(Locale::as_str),
            Some("es")
        );
        assert!(supported.find_by_language("de-DE").is_none());
        assert!(supported.find_by_language("").is_none());
    }
}
