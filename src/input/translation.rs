//! Translation table input definitions

use std::path::Path;

use indexmap::IndexMap;
use jsonc_parser::ParseOptions;
use serde::{
    Deserialize,
    Serialize,
};

use crate::loader::LoadError;

/// Translation table: key -> entry, in file order.
pub type Entries = IndexMap<String, Entry>;

/// Locale -> translated value mapping for a single key.
///
/// Insertion order is kept so that the "first available" value used as the
/// last resort of locale selection is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocaleValues(IndexMap<String, String>);

impl LocaleValues {
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    #[must_use]
    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, locale: &str) -> bool {
        self.0.contains_key(locale)
    }

    /// Sets the value for `locale`, keeping its position if already present.
    pub fn insert(&mut self, locale: impl Into<String>, value: impl Into<String>) {
        self.0.insert(locale.into(), value.into());
    }

    /// The value inserted first, regardless of locale.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(locale, value)| (locale.as_str(), value.as_str()))
    }

    /// Selects the value for `locale`.
    ///
    /// # Selection order
    /// 1. `locale` itself
    /// 2. the first of `fallbacks` that has a value
    /// 3. the first value in insertion order
    #[must_use]
    pub fn select(&self, locale: &str, fallbacks: &[String]) -> Option<&str> {
        self.get(locale)
            .or_else(|| fallbacks.iter().find_map(|fallback| self.get(fallback)))
            .or_else(|| self.first())
    }
}

impl<L, V> FromIterator<(L, V)> for LocaleValues
where
    L: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (L, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(locale, value)| (locale.into(), value.into())).collect())
    }
}

impl IntoIterator for LocaleValues {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// How `merge` treats values that already exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergePolicy {
    /// Incoming values replace existing ones.
    #[default]
    Override,
    /// Existing values win; only missing locales and keys are added.
    KeepExisting,
}

impl MergePolicy {
    #[must_use]
    pub const fn overrides(self) -> bool {
        matches!(self, Self::Override)
    }
}

/// A single translation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    /// Locale-independent value.
    Text(String),
    /// Per-locale values.
    Localized(LocaleValues),
}

impl Entry {
    /// Builds a localized entry from `(locale, value)` pairs.
    ///
    /// # Examples
    /// ```
    /// use tg_i18n::input::translation::Entry;
    ///
    /// let entry = Entry::localized([("en", "Hello"), ("de", "Hallo")]);
    /// assert_eq!(entry.select("de", &[]), Some("Hallo"));
    /// ```
    #[must_use]
    pub fn localized<L, V>(values: impl IntoIterator<Item = (L, V)>) -> Self
    where
        L: Into<String>,
        V: Into<String>,
    {
        Self::Localized(values.into_iter().collect())
    }

    /// Converts any serializable value into an entry.
    ///
    /// Structs with named string fields become localized entries, the field
    /// names being the locales, in declaration order.
    pub fn from_serializable<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).and_then(serde_json::from_value)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Localized(values) => values.is_empty(),
        }
    }

    /// Selects the value for `locale`; text entries ignore the locale.
    ///
    /// An empty text has no value.
    #[must_use]
    pub fn select(&self, locale: &str, fallbacks: &[String]) -> Option<&str> {
        match self {
            Self::Text(text) => (!text.is_empty()).then_some(text.as_str()),
            Self::Localized(values) => values.select(locale, fallbacks),
        }
    }

    /// Merges `incoming` into this entry.
    ///
    /// Two localized entries merge locale by locale. Any other combination
    /// is treated as a whole value.
    pub fn merge(&mut self, incoming: Self, policy: MergePolicy) {
        match (self, incoming) {
            (Self::Localized(existing), Self::Localized(incoming)) => {
                for (locale, value) in incoming {
                    if policy.overrides() || !existing.contains(&locale) {
                        existing.insert(locale, value);
                    }
                }
            }
            (existing, incoming) => {
                if policy.overrides() {
                    *existing = incoming;
                }
            }
        }
    }
}

impl From<&str> for Entry {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Entry {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<LocaleValues> for Entry {
    fn from(values: LocaleValues) -> Self {
        Self::Localized(values)
    }
}

/// Parse a translation table.
///
/// Comments and trailing commas are accepted. An empty document is an empty
/// table. `origin` is only used for error reporting.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use tg_i18n::input::translation::parse_entries;
///
/// let entries = parse_entries(
///     r#"{ "greeting": { "en": "Hello", "de": "Hallo" }, "brand": "Acme" }"#,
///     Path::new("i18n.json"),
/// )
/// .unwrap();
/// assert_eq!(entries.len(), 2);
/// ```
pub fn parse_entries(text: &str, origin: &Path) -> Result<Entries, LoadError> {
    let value = jsonc_parser::parse_to_serde_value(text, &ParseOptions::default()).map_err(
        |e| LoadError::Syntax { path: origin.to_path_buf(), message: e.to_string() },
    )?;

    let Some(value) = value else {
        return Ok(Entries::new());
    };

    serde_json::from_value(value)
        .map_err(|source| LoadError::Shape { path: origin.to_path_buf(), source })
}

/// Load a translation table file.
///
/// # Errors
/// Returns error if file read or parse fails.
pub fn load_entries_file(file_path: &Path) -> Result<Entries, LoadError> {
    let content = std::fs::read_to_string(file_path)
        .map_err(|source| LoadError::Io { path: file_path.to_path_buf(), source })?;

    let entries = parse_entries(&content, file_path)?;
    tracing::debug!(path = %file_path.display(), keys = entries.len(), "Loaded translation file");

    Ok(entries)
}
