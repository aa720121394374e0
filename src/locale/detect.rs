//! Startup locale detection.
//!
//! Precedence: `?lang=` query override, persisted preference, environment
//! locale (exact tag, then language only), default locale.

use tracing::debug;
use url::Url;

use super::{Locale, SupportedLocales};

/// Raw candidates gathered at startup. Any of them may be absent or junk.
#[derive(Debug, Clone, Default)]
pub struct DetectionInputs {
    /// Value of the `lang` query parameter.
    pub query: Option<String>,
    /// Previously persisted choice.
    pub stored: Option<String>,
    /// Environment / browser locale, e.g. `pt-BR`.
    pub environment: Option<String>,
}

impl DetectionInputs {
    /// Take the query candidate from a page URL.
    #[must_use]
    pub fn with_page_url(mut self, page_url: &str) -> Self {
        self.query = query_lang(page_url);
        self
    }
}

/// Which candidate picked the locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleSource {
    Query,
    Stored,
    Environment,
    EnvironmentLanguage,
    Default,
}

/// Pick the initial locale. Never fails; the default is the last resort.
pub fn detect_locale(supported: &SupportedLocales, inputs: &DetectionInputs) -> (Locale, LocaleSource) {
    let exact = |candidate: &Option<String>| {
        candidate
            .as_deref()
            .and_then(|tag| supported.find(tag))
            .cloned()
    };

    if let Some(locale) = exact(&inputs.query) {
        debug!("Locale {} taken from query parameter", locale);
        return (locale, LocaleSource::Query);
    }

    if let Some(locale) = exact(&inputs.stored) {
        debug!("Locale {} taken from stored preference", locale);
        return (locale, LocaleSource::Stored);
    }

    if let Some(locale) = exact(&inputs.environment) {
        debug!("Locale {} taken from environment", locale);
        return (locale, LocaleSource::Environment);
    }

    if let Some(locale) = inputs
        .environment
        .as_deref()
        .and_then(|tag| supported.find_by_language(tag))
    {
        debug!("Locale {} matched environment language", locale);
        return (locale.clone(), LocaleSource::EnvironmentLanguage);
    }

    (supported.default_locale().clone(), LocaleSource::Default)
}

/// `lang` query parameter of a URL, if the URL parses and has one.
pub fn query_lang(page_url: &str) -> Option<String> {
    let url = Url::parse(page_url).ok()?;
    url.query_pairs()
        .find(|(name, _)| name == "lang")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Turn a POSIX locale (`pt_BR.UTF-8`, `de_DE@euro`) into a language tag.
///
/// `C` and `POSIX` carry no language and yield `None`.
pub fn normalize_posix_locale(raw: &str) -> Option<String> {
    let base = raw
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() || base.eq_ignore_ascii_case("c") || base.eq_ignore_ascii_case("posix") {
        return None;
    }

    Some(base.replace('_', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supported() -> SupportedLocales {
        SupportedLocales::new(["en", "pt-BR", "es"], "en").unwrap()
    }

    #[test]
    fn test_query_beats_everything() {
        let inputs = DetectionInputs {
            query: Some("es".into()),
            stored: Some("pt-BR".into()),
            environment: Some("pt-BR".into()),
        };
        assert_eq!(
            detect_locale(&supported(), &inputs),
            (Locale::new("es"), LocaleSource::Query)
        );
    }

    #[test]
    fn test_unsupported_candidates_are_skipped() {
        let inputs = DetectionInputs {
            query: Some("fr".into()),
            stored: Some("pt-BR".into()),
            environment: None,
        };
        assert_eq!(
            detect_locale(&supported(), &inputs),
            (Locale::new("pt-BR"), LocaleSource::Stored)
        );
    }

    #[test]
    fn test_environment_language_match() {
        let inputs = DetectionInputs {
            environment: Some("pt-PT".into()),
            ..Default::default()
        };
        assert_eq!(
            detect_locale(&supported(), &inputs),
            (Locale::new("pt-BR"), LocaleSource::EnvironmentLanguage)
        );
    }

    #[test]
    fn test_falls_back_to_default() {
        let inputs = DetectionInputs {
            query: Some("xx".into()),
            stored: Some("".into()),
            environment: Some("de-DE".into()),
        };
        assert_eq!(
            detect_locale(&supported(), &inputs),
            (Locale::new("en"), LocaleSource::Default)
        );
    }

    #[test]
    fn test_query_lang() {
        assert_eq!(
            query_lang("https://blog.example/post?lang=pt-BR&x=1"),
            Some("pt-BR".to_string())
        );
        assert_eq!(query_lang("https://blog.example/post?lang="), None);
        assert_eq!(query_lang("https://blog.example/post"), None);
        assert_eq!(query_lang("not a url"), None);

        let inputs = DetectionInputs::default().with_page_url("https://blog.example/?lang=es");
        assert_eq!(inputs.query.as_deref(), Some("es"));
    }

    #[test]
    fn test_normalize_posix_locale() {
        assert_eq!(normalize_posix_locale("pt_BR.UTF-8"), Some("pt-BR".to_string()));
        assert_eq!(normalize_posix_locale("de_DE@euro"), Some("de-DE".to_string()));
        assert_eq!(normalize_posix_locale("es"), Some("es".to_string()));
        assert_eq!(normalize_posix_locale("C.UTF-8"), None);
        assert_eq!(normalize_posix_locale("POSIX"), None);
        assert_eq!(normalize_posix_locale(""), None);
    }
}
