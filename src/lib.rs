//! tg-i18n
//!
//! Translation lookup with per-locale fallback chains, lazily loaded tables
//! and mergeable additions.

pub mod config;
pub mod format;
pub mod input;
pub mod loader;
pub mod lookup;
pub mod table;

#[cfg(test)]
mod test_utils;

pub use input::translation::{
    Entries,
    Entry,
    LocaleValues,
    MergePolicy,
};
pub use lookup::Lookup;
pub use table::TranslationTable;
