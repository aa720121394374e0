//! `{name}` placeholder substitution.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("placeholder pattern is valid"));

/// Replace every `{name}` that has a value in `replacements`.
///
/// Tokens without a value are kept verbatim so a missing argument shows
/// up on the page. Substituted values are not scanned again.
pub fn substitute(template: &str, replacements: &[(&str, &str)]) -> String {
    if replacements.is_empty() || !template.contains('{') {
        return template.to_string();
    }

    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let name = &caps[1];
            replacements
                .iter()
                .find(|(key, _)| *key == name)
                .map_or_else(|| caps[0].to_string(), |(_, value)| (*value).to_string())
        })
        .into_owned()
}
