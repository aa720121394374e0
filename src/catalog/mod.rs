//! Translation catalogs.
//!
//! A catalog is a tree of string keys whose leaves are display strings:
//!
//! ```json
//! { "nav": { "home": "Home", "about": "About" }, "greeting": "Hello {name}" }
//! ```
//!
//! Catalog files are validated when they are loaded. Anything other than
//! objects and strings (numbers, arrays, null) rejects the whole file, so
//! lookups never have to guess at the shape of a node.

mod source;

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::CatalogError;
use crate::locale::Locale;

pub use source::{CatalogSource, DirectorySource, StaticSource};

/// One node of a catalog tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogNode {
    Text(String),
    Branch(BTreeMap<String, CatalogNode>),
}

impl CatalogNode {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Branch(_) => None,
        }
    }
}

/// The full translation tree of one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    root: BTreeMap<String, CatalogNode>,
}

impl Catalog {
    /// Parse and validate the raw text of a catalog file.
    pub fn from_json_str(locale: &Locale, raw: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(raw).map_err(|source| CatalogError::Parse {
            locale: locale.clone(),
            source,
        })?;
        Self::from_value(locale, value)
    }

    /// Validate an already parsed JSON document.
    pub fn from_value(locale: &Locale, value: Value) -> Result<Self, CatalogError> {
        match convert(locale, value, "")? {
            CatalogNode::Branch(root) => Ok(Self { root }),
            CatalogNode::Text(_) => Err(CatalogError::Malformed {
                locale: locale.clone(),
                path: "<root>".to_string(),
                found: "string",
            }),
        }
    }

    /// Build a catalog from `(key path, text)` pairs.
    ///
    /// Later pairs win when a path collides with an earlier one.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut root = BTreeMap::new();
        for (path, text) in entries {
            insert_path(&mut root, path, text);
        }
        Self { root }
    }

    /// Walk a dot-separated key path.
    pub fn lookup(&self, key_path: &str) -> Option<&CatalogNode> {
        let mut segments = key_path.split('.');
        let mut node = self.root.get(segments.next()?)?;
        for segment in segments {
            match node {
                CatalogNode::Branch(children) => node = children.get(segment)?,
                CatalogNode::Text(_) => return None,
            }
        }
        Some(node)
    }

    /// Leaf text at `key_path`, if the path ends on a string.
    pub fn text(&self, key_path: &str) -> Option<&str> {
        self.lookup(key_path).and_then(CatalogNode::as_text)
    }

    /// Full key paths of every leaf, in sorted order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        collect_keys(&self.root, "", &mut keys);
        keys
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        fn count(children: &BTreeMap<String, CatalogNode>) -> usize {
            children
                .values()
                .map(|node| match node {
                    CatalogNode::Text(_) => 1,
                    CatalogNode::Branch(inner) => count(inner),
                })
                .sum()
        }
        count(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Leaf paths of `self` that `other` has no text for.
    pub fn missing_from(&self, other: &Catalog) -> Vec<String> {
        self.keys()
            .into_iter()
            .filter(|key| other.text(key).is_none())
            .collect()
    }
}

fn convert(locale: &Locale, value: Value, path: &str) -> Result<CatalogNode, CatalogError> {
    let found = match value {
        Value::String(text) => return Ok(CatalogNode::Text(text)),
        Value::Object(map) => {
            let mut children = BTreeMap::new();
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                children.insert(key, convert(locale, child, &child_path)?);
            }
            return Ok(CatalogNode::Branch(children));
        }
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::Array(_) => "array",
    };

    Err(CatalogError::Malformed {
        locale: locale.clone(),
        path: if path.is_empty() { "<root>".to_string() } else { path.to_string() },
        found,
    })
}

fn insert_path(root: &mut BTreeMap<String, CatalogNode>, path: &str, text: &str) {
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(leaf) = segments.pop() else {
        return;
    };

    let mut children = root;
    for segment in segments {
        let node = children
            .entry(segment.to_string())
            .or_insert_with(|| CatalogNode::Branch(BTreeMap::new()));
        if let CatalogNode::Text(_) = node {
            *node = CatalogNode::Branch(BTreeMap::new());
        }
        let CatalogNode::Branch(inner) = node else {
            return;
        };
        children = inner;
    }
    children.insert(leaf.to_string(), CatalogNode::Text(text.to_string()));
}

fn collect_keys(children: &BTreeMap<String, CatalogNode>, prefix: &str, out: &mut Vec<String>) {
    for (key, node) in children {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match node {
            CatalogNode::Text(_) => out.push(path),
            CatalogNode::Branch(inner) => collect_keys(inner, &path, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en() -> Locale {
        Locale::new("en")
    }

    #[test]
    fn test_lookup_nested() {
        let catalog = Catalog::from_json_str(
            &en(),
            r#"{"nav": {"home": "Home", "blog": {"title": "Blog"}}, "footer": "Bye"}"#,
        )
        .unwrap();

        assert_eq!(catalog.text("nav.home"), Some("Home"));
        assert_eq!(catalog.text("nav.blog.title"), Some("Blog"));
        assert_eq!(catalog.text("footer"), Some("Bye"));
        assert!(matches!(catalog.lookup("nav"), Some(CatalogNode::Branch(_))));
        assert_eq!(catalog.text("nav"), None);
        assert_eq!(catalog.text("nav.missing"), None);
        assert_eq!(catalog.text("footer.deeper"), None);
        assert_eq!(catalog.text(""), None);
        assert_eq!(catalog.text("nav..home"), None);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_malformed_leaf_is_rejected_with_path() {
        let err = Catalog::from_json_str(&en(), r#"{"nav": {"count": 3}}"#).unwrap_err();
        match err {
            CatalogError::Malformed { path, found, .. } => {
                assert_eq!(path, "nav.count");
                assert_eq!(found, "number");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = Catalog::from_json_str(&en(), r#"["a"]"#).unwrap_err();
        assert!(matches!(err, CatalogError::Malformed { found: "array", .. }));

        let err = Catalog::from_json_str(&en(), r#""just text""#).unwrap_err();
        assert!(matches!(err, CatalogError::Malformed { found: "string", .. }));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = Catalog::from_json_str(&en(), "{ nav: ").unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
        assert_eq!(err.locale().as_str(), "en");
    }

    #[test]
    fn test_from_entries_and_keys() {
        let catalog = Catalog::from_entries([
            ("nav.home", "Home"),
            ("nav.about", "About"),
            ("meta.title", "Blog"),
        ]);
        assert_eq!(catalog.keys(), vec!["meta.title", "nav.about", "nav.home"]);
        assert_eq!(catalog.text("nav.about"), Some("About"));
    }

    #[test]
    fn test_missing_from() {
        let en = Catalog::from_entries([("nav.home", "Home"), ("nav.about", "About")]);
        let pt = Catalog::from_entries([("nav.home", "Início")]);
        assert_eq!(en.missing_from(&pt), vec!["nav.about"]);
        assert!(pt.missing_from(&en).is_empty());
    }
}
