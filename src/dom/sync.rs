//! Applying translations to annotated elements.

use super::Element;

/// Attribute holding an element's translation key path.
pub const KEY_ATTR: &str = "data-i18n";

/// Flag attribute: insert the translation as markup instead of text.
pub const HTML_ATTR: &str = "data-i18n-html";

/// Attribute naming the locale a language-switcher button selects.
pub const LANG_ATTR: &str = "data-lang";

/// Property of an element that receives its translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// `placeholder` attribute of form fields.
    Placeholder,
    /// `alt` attribute of images.
    AltText,
    /// Rich markup content.
    Markup,
    /// Plain text content.
    Text,
}

pub fn target_for(element: &Element) -> Target {
    match element.tag() {
        "input" | "textarea" => Target::Placeholder,
        "img" => Target::AltText,
        _ if element.has_attr(HTML_ATTR) => Target::Markup,
        _ => Target::Text,
    }
}

/// Counts from one synchronization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Elements carrying a key annotation.
    pub annotated: usize,
    /// Elements whose target actually changed.
    pub updated: usize,
}

impl SyncReport {
    pub fn unchanged(&self) -> usize {
        self.annotated - self.updated
    }
}

/// Resolve and assign the translation of every annotated element under
/// `root`, in document order.
///
/// Assigning a value equal to the current one is skipped, so a second
/// pass with the same translations reports no updates.
pub fn synchronize(root: &mut Element, mut resolve: impl FnMut(&str) -> String) -> SyncReport {
    let mut report = SyncReport::default();
    root.walk_mut(&mut |element: &mut Element| {
        let Some(key) = element.attr(KEY_ATTR).map(str::to_string) else {
            return;
        };
        report.annotated += 1;

        let target = target_for(element);
        let value = resolve(&key);
        if apply(element, target, value) {
            report.updated += 1;
        }
    });
    report
}

fn apply(element: &mut Element, target: Target, value: String) -> bool {
    let current = match target {
        Target::Placeholder => element.attr("placeholder"),
        Target::AltText => element.attr("alt"),
        Target::Markup => element.markup(),
        Target::Text => element.text(),
    };
    if current == Some(value.as_str()) {
        return false;
    }

    match target {
        Target::Placeholder => element.set_attr("placeholder", value),
        Target::AltText => element.set_attr("alt", value),
        Target::Markup => element.set_markup(value),
        Target::Text => element.set_text(value),
    }
    true
}

/// Highlight the language-switcher buttons (`data-lang`) for `locale`:
/// the matching ones get the `active` class and `aria-pressed="true"`,
/// the others lose the class and get `aria-pressed="false"`.
///
/// Returns how many buttons were visited.
pub fn mark_active_language(root: &mut Element, locale: &str) -> usize {
    let mut buttons = 0;
    root.walk_mut(&mut |element: &mut Element| {
        let Some(lang) = element.attr(LANG_ATTR) else {
            return;
        };
        buttons += 1;

        let active = lang.eq_ignore_ascii_case(locale);
        if active {
            element.add_class("active");
        } else {
            element.remove_class("active");
        }
        element.set_attr("aria-pressed", if active { "true" } else { "false" });
    });
    buttons
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Element {
        Element::new("body")
            .with_child(Element::new("h1").with_attr(KEY_ATTR, "title"))
            .with_child(Element::new("input").with_attr(KEY_ATTR, "search"))
            .with_child(Element::new("textarea").with_attr(KEY_ATTR, "search"))
            .with_child(Element::new("img").with_attr(KEY_ATTR, "logo"))
            .with_child(
                Element::new("div")
                    .with_attr(KEY_ATTR, "intro")
                    .with_attr(HTML_ATTR, ""),
            )
            .with_child(Element::new("p").with_text("untouched"))
    }

    fn translate(key: &str) -> String {
        format!("<{key}>")
    }

    #[test]
    fn test_targets_by_element_kind() {
        let mut root = page();
        let report = synchronize(&mut root, translate);
        assert_eq!(report, SyncReport { annotated: 5, updated: 5 });

        let children = root.children();
        assert_eq!(children[0].text(), Some("<title>"));
        assert_eq!(children[1].attr("placeholder"), Some("<search>"));
        assert_eq!(children[1].text(), None);
        assert_eq!(children[2].attr("placeholder"), Some("<search>"));
        assert_eq!(children[3].attr("alt"), Some("<logo>"));
        assert_eq!(children[4].markup(), Some("<intro>"));
        assert_eq!(children[5].text(), Some("untouched"));
    }

    #[test]
    fn test_second_pass_changes_nothing() {
        let mut root = page();
        synchronize(&mut root, translate);
        let snapshot = root.clone();

        let report = synchronize(&mut root, translate);
        assert_eq!(report.updated, 0);
        assert_eq!(report.unchanged(), 5);
        assert_eq!(root, snapshot);
    }

    #[test]
    fn test_html_flag_ignored_on_form_fields() {
        let input = Element::new("input")
            .with_attr(KEY_ATTR, "k")
            .with_attr(HTML_ATTR, "");
        assert_eq!(target_for(&input), Target::Placeholder);
    }

    #[test]
    fn test_mark_active_language() {
        let mut root = Element::new("nav")
            .with_child(
                Element::new("button")
                    .with_attr(LANG_ATTR, "en")
                    .with_attr("class", "lang-btn active"),
            )
            .with_child(
                Element::new("button")
                    .with_attr(LANG_ATTR, "pt-BR")
                    .with_attr("class", "lang-btn"),
            );

        assert_eq!(mark_active_language(&mut root, "pt-BR"), 2);

        let buttons = root.children();
        assert!(!buttons[0].has_class("active"));
        assert_eq!(buttons[0].attr("aria-pressed"), Some("false"));
        assert!(buttons[1].has_class("active"));
        assert_eq!(buttons[1].attr("aria-pressed"), Some("true"));
    }
}
