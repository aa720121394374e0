//! Minimal document tree the resolver can localize.
//!
//! Elements opt in with `data-i18n="<key path>"`. Which property receives
//! the translation depends on the element; see [`Target`].
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut nav = Element::new("nav")
//!     .with_child(Element::new("a").with_attr("data-i18n", "nav.home"))
//!     .with_child(Element::new("input").with_attr("data-i18n", "search.placeholder"));
//!
//! let report = resolver.synchronize_dom(&mut nav);
//! ```

mod document;
mod sync;

use std::collections::BTreeMap;

pub use document::Document;
pub use sync::{
    HTML_ATTR, KEY_ATTR, LANG_ATTR, SyncReport, Target, mark_active_language, synchronize, target_for,
};

/// What an element currently displays, if anything was assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    /// Raw markup, inserted as-is. Sanitizing is the renderer's job.
    Markup(String),
}

/// An element with attributes, optional content and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    content: Option<Content>,
    children: Vec<Element>,
}

impl Element {
    /// Create an element; the tag name is stored lowercase.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            content: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    pub fn content(&self) -> Option<&Content> {
        self.content.as_ref()
    }

    /// Plain text content, if plain text was assigned.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Some(Content::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Rich markup content, if markup was assigned.
    pub fn markup(&self) -> Option<&str> {
        match &self.content {
            Some(Content::Markup(markup)) => Some(markup),
            _ => None,
        }
    }

    /// Replace the element's content with text. Like `textContent`, this
    /// drops the children.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.content = Some(Content::Text(text.into()));
        self.children.clear();
    }

    /// Replace the element's content with markup. Drops the children.
    pub fn set_markup(&mut self, markup: impl Into<String>) {
        self.content = Some(Content::Markup(markup.into()));
        self.children.clear();
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Element> {
        &mut self.children
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|list| list.split_whitespace().any(|c| c == class))
    }

    /// Add a class. Returns `false` if it was already present.
    pub fn add_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            return false;
        }
        let list = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
            _ => class.to_string(),
        };
        self.set_attr("class", list);
        true
    }

    /// Remove a class. Returns `false` if it was not present.
    pub fn remove_class(&mut self, class: &str) -> bool {
        if !self.has_class(class) {
            return false;
        }
        let list: Vec<&str> = self
            .attr("class")
            .unwrap_or_default()
            .split_whitespace()
            .filter(|c| *c != class)
            .collect();
        let list = list.join(" ");
        self.set_attr("class", list);
        true
    }

    /// First element in document order (including `self`) with this `id`.
    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.attr("id") == Some(id) {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_by_id_mut(id))
    }

    /// Visit every element in document order, `self` first.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Element)) {
        visit(self);
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_replaces_children() {
        let mut el = Element::new("P").with_child(Element::new("span"));
        assert_eq!(el.tag(), "p");
        el.set_text("hello");
        assert_eq!(el.text(), Some("hello"));
        assert!(el.children().is_empty());
        assert_eq!(el.markup(), None);
    }

    #[test]
    fn test_class_list() {
        let mut el = Element::new("button").with_attr("class", "lang-btn");
        assert!(el.add_class("active"));
        assert!(!el.add_class("active"));
        assert_eq!(el.attr("class"), Some("lang-btn active"));
        assert!(el.remove_class("active"));
        assert!(!el.remove_class("active"));
        assert_eq!(el.attr("class"), Some("lang-btn"));
    }

    #[test]
    fn test_find_by_id() {
        let mut root = Element::new("body").with_child(
            Element::new("div").with_child(Element::new("p").with_attr("id", "target")),
        );
        let found = root.find_by_id_mut("target").unwrap();
        found.set_text("x");
        assert!(root.find_by_id_mut("missing").is_none());
    }
}
