//! Page-level localization beyond annotated elements: head metadata,
//! alternate-language links, the `?lang=` URL and the screen-reader
//! announcement.

use std::iter;

use serde::Serialize;
use url::Url;

use crate::locale::SupportedLocales;
use crate::resolver::TranslationResolver;

/// `id` of the live region that announces language changes.
pub const ANNOUNCER_ID: &str = "sr-announcements";

/// Localized head metadata for the active locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    /// Open Graph locale, e.g. `pt_BR`.
    pub og_locale: &'static str,
}

/// Resolve `meta.title`, `meta.description` and `meta.keywords`.
///
/// Unlike element text, a missing entry stays `None` so the head never
/// shows a raw key path.
pub fn page_meta(resolver: &TranslationResolver) -> PageMeta {
    let locale = resolver.active_locale();
    PageMeta {
        title: resolver.try_translate("meta.title", &[]),
        description: resolver.try_translate("meta.description", &[]),
        keywords: resolver.try_translate("meta.keywords", &[]),
        og_locale: og_locale(locale.as_str()),
    }
}

/// Open Graph locale for a site locale. Unknown locales get `en_US`.
pub fn og_locale(locale: &str) -> &'static str {
    match locale {
        "pt-BR" => "pt_BR",
        "es" => "es_ES",
        _ => "en_US",
    }
}

/// One `<link rel="alternate" hreflang=..>` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlternateLink {
    pub hreflang: String,
    pub href: String,
}

/// Alternate links for every supported locale plus `x-default`.
///
/// Hrefs are the page URL without its query or fragment, carrying only
/// `?lang=<locale>`.
pub fn alternate_links(page_url: &Url, supported: &SupportedLocales) -> Vec<AlternateLink> {
    let mut base = page_url.clone();
    base.set_query(None);
    base.set_fragment(None);

    let link = |hreflang: &str, locale: &str| AlternateLink {
        hreflang: hreflang.to_string(),
        href: with_lang_param(&base, locale).to_string(),
    };

    supported
        .iter()
        .map(|locale| link(locale.as_str(), locale.as_str()))
        .chain(iter::once(link("x-default", supported.default_locale().as_str())))
        .collect()
}

/// Set the `lang` query parameter, keeping the other parameters and the
/// fragment.
pub fn with_lang_param(page_url: &Url, locale: &str) -> Url {
    let kept: Vec<(String, String)> = page_url
        .query_pairs()
        .filter(|(name, _)| name != "lang")
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    let mut url = page_url.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("lang", locale);
    url
}

/// Message read out by screen readers after a language change.
pub fn announcement(locale: &str) -> &'static str {
    match locale {
        "pt-BR" => "Idioma alterado para Português",
        "es" => "Idioma cambiado a Español",
        _ => "Language changed to English",
    }
}
