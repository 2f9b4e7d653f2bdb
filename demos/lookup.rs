//! Looks up a key in a workspace's translations.
//!
//! Usage:
//! ```
//! RUST_LOG=debug cargo run --example lookup -- /path/to/workspace key [locale]
//! ```

use std::path::PathBuf;

use tg_i18n::{
    MergePolicy,
    TranslationTable,
};
use tg_i18n::config::load_settings;

fn main() {
    // INFO unless RUST_LOG says otherwise
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let workspace_path = args.get(1).map_or_else(|| PathBuf::from("."), PathBuf::from);
    let key = args.get(2).map_or("greeting", String::as_str);
    let locale = args.get(3).map(String::as_str);

    let settings = match load_settings(Some(workspace_path.as_path())) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };

    let mut table = TranslationTable::from_settings(&settings);
    if let Err(e) = table.load() {
        tracing::warn!("{e}");
    }

    match table.merge_discovered(
        &workspace_path,
        &settings.translation_files,
        MergePolicy::KeepExisting,
    ) {
        Ok(count) => tracing::info!(count, "Merged discovered translation files"),
        Err(e) => tracing::warn!("{e}"),
    }

    match table.lookup_or_nil(key, locale) {
        Some(value) => tracing::info!(key, ?locale, value, "Translated"),
        None => tracing::info!(key, ?locale, "No translation"),
    }
}
