//! sitelingo - resolve site translations from the command line.
//!
//! Loads the catalogs configured in the environment, picks the starting
//! locale the same way the site does (`--lang`, a page URL's `?lang=`,
//! the stored preference, `LANG`, the default) and prints translations.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sitelingo::page;
use sitelingo::{
    Config, DetectionInputs, DirectorySource, JsonFileStore, LocaleEvent, TranslationResolver,
};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Debug, Parser)]
#[command(name = "sitelingo", version, about = "Resolve site translations from locale catalogs")]
struct Args {
    /// Locale to use, like the `?lang=` query parameter
    #[arg(long)]
    lang: Option<String>,

    /// Page URL whose `lang` query parameter selects the locale
    #[arg(long, env = "SITELINGO_PAGE_URL")]
    page_url: Option<String>,

    /// Placeholder value as NAME=VALUE (repeatable)
    #[arg(long = "set", value_parser = parse_replacement)]
    replacements: Vec<(String, String)>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Key paths to resolve, e.g. nav.home
    keys: Vec<String>,
}

fn parse_replacement(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{raw}'")),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sitelingo=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::from_env();
    let supported = config
        .supported_locales()
        .context("invalid locale configuration")?;
    info!(
        "Catalogs from {} ({} locales, default {})",
        config.catalog_dir.display(),
        supported.len(),
        supported.default_locale()
    );

    let resolver = TranslationResolver::new(
        supported,
        Arc::new(DirectorySource::new(&config.catalog_dir)),
        Arc::new(JsonFileStore::new(&config.preferences_path)),
    );
    resolver.subscribe(Arc::new(|event: &LocaleEvent| match event {
        LocaleEvent::Ready { locale } => info!("Ready in {}", locale),
        LocaleEvent::Changed { locale, catalog } => {
            info!("Switched to {} ({} keys)", locale, catalog.len())
        }
    }));

    let mut inputs = DetectionInputs {
        environment: config.environment_locale.clone(),
        ..Default::default()
    };
    let page_url = args
        .page_url
        .clone()
        .or_else(|| config.base_url.as_ref().map(|url| url.to_string()));
    if let Some(url) = &page_url {
        inputs = inputs.with_page_url(url);
    }
    if args.lang.is_some() {
        inputs.query = args.lang.clone();
    }

    let locale = resolver
        .initialize(&inputs)
        .await
        .context("no catalog could be loaded")?;

    if args.keys.is_empty() {
        let catalog = resolver.active_catalog();
        println!("{}: {} keys", locale, catalog.len());

        let default = resolver.default_locale().clone();
        if locale != default {
            match resolver.load(&default).await {
                Ok(default_catalog) => {
                    let missing = default_catalog.missing_from(&catalog);
                    println!("{} keys fall back to {}", missing.len(), default);
                    for key in missing {
                        println!("  {key}");
                    }
                }
                Err(e) => warn!("Cannot compare with {}: {}", default, e),
            }
        }
        return Ok(());
    }

    let replacements: Vec<(&str, &str)> = args
        .replacements
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();

    let translations: BTreeMap<&str, String> = args
        .keys
        .iter()
        .map(|key| (key.as_str(), resolver.translate(key, &replacements)))
        .collect();
    let missing = resolver.missing_keys();

    if args.json {
        let report = json!({
            "locale": locale,
            "meta": page::page_meta(&resolver),
            "translations": translations,
            "missing": missing,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for (key, value) in &translations {
        println!("{key} = {value}");
    }
    for key in &missing {
        warn!("Missing translation: {} ({})", key.key_path, key.locale);
    }

    Ok(())
}
