//! sitelingo - translation resolution for multilingual sites.
//!
//! Resolves dot-separated key paths against nested locale catalogs, with
//! `{name}` placeholders and fallback to a default locale, and keeps a
//! document tree in sync with the active locale.
//!
//! ## Architecture
//!
//! - `locale` - Locale tags, the supported set, startup detection
//! - `catalog` - Typed catalog trees and where they are loaded from
//! - `cache` - Moka-backed storage for loaded catalogs
//! - `preference` - Persisted locale preference
//! - `resolver` - The translation resolver and its listeners
//! - `dom` - Document tree and its synchronization
//! - `page` - Head metadata, alternate links, `?lang=` URLs
//! - `config` - Environment configuration

pub mod cache;
pub mod catalog;
pub mod config;
pub mod dom;
pub mod error;
pub mod locale;
pub mod page;
pub mod preference;
pub mod resolver;

pub use catalog::{Catalog, CatalogNode, CatalogSource, DirectorySource, StaticSource};
pub use config::Config;
pub use dom::{Document, Element, SyncReport};
pub use error::{CatalogError, ConfigError, PreferenceError, SwitchError};
pub use locale::{DetectionInputs, Locale, SupportedLocales};
pub use preference::{JsonFileStore, MemoryStore, PreferenceStore};
pub use resolver::{LocaleEvent, LocaleListener, SwitchOutcome, TranslationResolver};
