//! Test helpers shared by several test modules.
#![cfg(test)]

use crate::input::translation::{
    Entries,
    Entry,
};
use crate::loader::StaticLoader;
use crate::table::TranslationTable;

/// Builds entries from a list of keys with their `(locale, value)` pairs.
pub(crate) fn entries(items: &[(&str, &[(&str, &str)])]) -> Entries {
    items
        .iter()
        .map(|(key, values)| ((*key).to_string(), Entry::localized(values.iter().copied())))
        .collect()
}

/// An unloaded table holding only `testKey`.
pub(crate) fn test_table() -> TranslationTable<StaticLoader> {
    TranslationTable::new(StaticLoader(entries(&[(
        "testKey",
        &[("en", "testValue-EN"), ("de", "testValue-DE")],
    )])))
}
