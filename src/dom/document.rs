//! A whole page: head metadata, alternate links, URL and body.

use std::collections::BTreeMap;

use url::Url;

use super::{Element, SyncReport, mark_active_language};
use crate::page::{self, ANNOUNCER_ID, AlternateLink, PageMeta};
use crate::resolver::TranslationResolver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lang: String,
    title: String,
    /// `<meta>` tags by `name` or `property`, e.g. `description`, `og:title`.
    meta: BTreeMap<String, String>,
    alternates: Vec<AlternateLink>,
    url: Option<Url>,
    body: Element,
}

impl Document {
    pub fn new(body: Element) -> Self {
        Self {
            lang: String::new(),
            title: String::new(),
            meta: BTreeMap::new(),
            alternates: Vec::new(),
            url: None,
            body,
        }
    }

    /// Page address, needed for alternate links and the `?lang=` rewrite.
    #[must_use]
    pub fn with_url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    /// Declare a `<meta>` tag. Only declared tags are updated on localize.
    #[must_use]
    pub fn with_meta(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.meta.insert(name.into(), content.into());
        self
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn meta(&self, name: &str) -> Option<&str> {
        self.meta.get(name).map(String::as_str)
    }

    pub fn alternates(&self) -> &[AlternateLink] {
        &self.alternates
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Element {
        &mut self.body
    }

    /// Write localized metadata into the title and the declared tags.
    pub fn apply_meta(&mut self, meta: &PageMeta) {
        if let Some(title) = &meta.title {
            self.title = title.clone();
            self.update_meta("og:title", title);
            self.update_meta("twitter:title", title);
        }
        if let Some(description) = &meta.description {
            self.update_meta("description", description);
            self.update_meta("og:description", description);
            self.update_meta("twitter:description", description);
        }
        if let Some(keywords) = &meta.keywords {
            self.update_meta("keywords", keywords);
        }
        self.update_meta("og:locale", meta.og_locale);
    }

    /// Replace all alternate-language links.
    pub fn apply_alternates(&mut self, links: Vec<AlternateLink>) {
        self.alternates = links;
    }

    fn update_meta(&mut self, name: &str, content: &str) {
        if let Some(existing) = self.meta.get_mut(name) {
            *existing = content.to_string();
        }
    }

    /// Bring the whole page to the resolver's active locale.
    pub fn localize(&mut self, resolver: &TranslationResolver) -> SyncReport {
        let locale = resolver.active_locale();
        self.lang = locale.to_string();

        self.apply_meta(&page::page_meta(resolver));

        if let Some(url) = &self.url {
            let links = page::alternate_links(url, resolver.supported_locales());
            let rewritten = page::with_lang_param(url, locale.as_str());
            self.apply_alternates(links);
            self.url = Some(rewritten);
        }

        let report = resolver.synchronize_dom(&mut self.body);
        mark_active_language(&mut self.body, locale.as_str());

        if let Some(region) = self.body.find_by_id_mut(ANNOUNCER_ID) {
            region.set_text(page::announcement(locale.as_str()));
        }

        report
    }
}
