//! The translation table: lazy loading, locale fallback and merging.

use std::path::{
    Path,
    PathBuf,
};

use crate::config::{
    DEFAULT_LOCALE,
    I18nSettings,
    TranslationFilesConfig,
};
use crate::format::{
    Arg,
    sprintf,
};
use crate::input::translation::{
    Entries,
    Entry,
    MergePolicy,
    load_entries_file,
};
use crate::loader::{
    CandidateLoader,
    LoadError,
    Loader,
    discover_translation_files,
};
use crate::lookup::Lookup;

/// Translations keyed by message key, resolved per locale.
///
/// The entries are loaded once, on first access, through the injected
/// [`Loader`]. Until then the table is unloaded, which is distinct from
/// loaded and empty.
///
/// # Examples
/// ```
/// use tg_i18n::TranslationTable;
/// use tg_i18n::input::translation::{Entries, Entry};
/// use tg_i18n::loader::StaticLoader;
///
/// let entries: Entries = [(
///     "greeting".to_string(),
///     Entry::localized([("en", "Hello, %s"), ("de", "Hallo, %s")]),
/// )]
/// .into_iter()
/// .collect();
/// let mut table = TranslationTable::new(StaticLoader(entries));
///
/// assert_eq!(table.resolve("greeting", Some("de"), &["Ada".into()]).as_deref(), Some("Hallo, Ada"));
/// assert_eq!(table.lookup_or_key("farewell", None).as_deref(), Some("farewell"));
/// assert_eq!(table.lookup_or_nil("farewell", None), None);
/// ```
#[derive(Debug, Clone)]
pub struct TranslationTable<L = CandidateLoader> {
    default_locale: String,
    fallback_locales: Vec<String>,
    source_file: Option<PathBuf>,
    /// `None` until the first load.
    entries: Option<Entries>,
    loader: L,
}

impl Default for TranslationTable {
    fn default() -> Self {
        Self::new(CandidateLoader::default())
    }
}

impl TranslationTable {
    /// Builds a table from validated settings, probing the configured
    /// source file and search roots.
    #[must_use]
    pub fn from_settings(settings: &I18nSettings) -> Self {
        let mut table = Self::new(CandidateLoader::from_settings(settings));
        table.default_locale.clone_from(&settings.default_locale);
        table.fallback_locales.clone_from(&settings.fallback_locales);
        table.source_file.clone_from(&settings.source_file);
        table
    }
}

impl<L: Loader> TranslationTable<L> {
    #[must_use]
    pub fn new(loader: L) -> Self {
        Self {
            default_locale: DEFAULT_LOCALE.to_string(),
            fallback_locales: vec![DEFAULT_LOCALE.to_string()],
            source_file: None,
            entries: None,
            loader,
        }
    }

    #[must_use]
    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn set_default_locale(&mut self, locale: impl Into<String>) {
        self.default_locale = locale.into();
    }

    #[must_use]
    pub fn fallback_locales(&self) -> &[String] {
        &self.fallback_locales
    }

    pub fn set_fallback_locales<I, S>(&mut self, locales: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallback_locales = locales.into_iter().map(Into::into).collect();
    }

    #[must_use]
    pub fn source_file(&self) -> Option<&Path> {
        self.source_file.as_deref()
    }

    /// Sets the primary translation file.
    ///
    /// Only consulted by the first load; after that it takes effect on the
    /// next load following [`reset`](Self::reset).
    pub fn set_source_file(&mut self, path: Option<PathBuf>) {
        if self.is_loaded() {
            tracing::debug!(?path, "Source file set after load; effective after reset");
        }
        self.source_file = path;
    }

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.entries.is_some()
    }

    #[must_use]
    pub const fn loader(&self) -> &L {
        &self.loader
    }

    /// Loads the entries if that has not happened yet.
    ///
    /// When the loader fails the table still ends up loaded, with no entries,
    /// and the error is returned.
    pub fn load(&mut self) -> Result<(), LoadError> {
        if self.is_loaded() {
            return Ok(());
        }

        let (entries, outcome) = match self.loader.load(self.source_file.as_deref()) {
            Ok(Some(entries)) => (entries, Ok(())),
            Ok(None) => (Entries::new(), Ok(())),
            Err(e) => (Entries::new(), Err(e)),
        };
        tracing::debug!(keys = entries.len(), "Translation table loaded");
        self.entries = Some(entries);

        outcome
    }

    fn ensure_loaded(&mut self) -> &mut Entries {
        if let Err(e) = self.load() {
            tracing::warn!("Failed to load translations, continuing without: {e}");
        }
        self.entries.get_or_insert_with(Entries::new)
    }

    /// All entries, loading them first if needed.
    pub fn entries(&mut self) -> &Entries {
        self.ensure_loaded()
    }

    /// Returns the entry for `key`, loading the table first if needed.
    pub fn get_entry(&mut self, key: &str) -> Option<&Entry> {
        self.ensure_loaded().get(key)
    }

    /// Returns the value for `key` in `locale`, or the key itself when the
    /// table has no entry for it.
    ///
    /// Without a locale the default locale is used. A localized entry with
    /// no value for the locale falls back through the fallback locales, then
    /// to its first value.
    ///
    /// Returns `None` for an empty key and for entries without any value.
    pub fn lookup_or_key<'k>(
        &mut self,
        key: impl Into<Lookup<'k>>,
        locale: Option<&str>,
    ) -> Option<String> {
        let lookup = key.into();
        if lookup.is_empty() {
            return None;
        }

        if lookup.as_key().is_some() {
            self.ensure_loaded();
        }
        let locale = locale.filter(|l| !l.is_empty()).unwrap_or(self.default_locale.as_str());

        let entry = match lookup {
            Lookup::Bundle(entry) => entry,
            Lookup::Key(key) => match self.entries.as_ref().and_then(|entries| entries.get(key)) {
                Some(entry) => entry,
                None => {
                    tracing::trace!(key, "No translation entry");
                    return Some(key.to_string());
                }
            },
        };

        entry.select(locale, &self.fallback_locales).map(str::to_string)
    }

    /// Like [`lookup_or_key`](Self::lookup_or_key), but `None` when nothing
    /// other than the key itself came back.
    pub fn lookup_or_nil<'k>(
        &mut self,
        key: impl Into<Lookup<'k>>,
        locale: Option<&str>,
    ) -> Option<String> {
        let lookup = key.into();
        let value = self.lookup_or_key(lookup, locale)?;

        match lookup.as_key() {
            Some(key) if key == value => None,
            _ => Some(value),
        }
    }

    /// Looks `key` up and substitutes `args` into the value, `sprintf` style.
    ///
    /// See [`sprintf`](crate::format::sprintf) for the supported conversions.
    pub fn resolve<'k>(
        &mut self,
        key: impl Into<Lookup<'k>>,
        locale: Option<&str>,
        args: &[Arg<'_>],
    ) -> Option<String> {
        self.lookup_or_key(key, locale).map(|value| sprintf(&value, args))
    }

    /// Merges `new_entries` into the table, loading it first if needed.
    ///
    /// Keys present on both sides are merged per locale according to
    /// `policy`; new keys are inserted as they are.
    pub fn merge_entries(&mut self, new_entries: Entries, policy: MergePolicy) {
        if new_entries.is_empty() {
            return;
        }

        let entries = self.ensure_loaded();
        for (key, incoming) in new_entries {
            match entries.get_mut(&key) {
                Some(existing) => existing.merge(incoming, policy),
                None => {
                    entries.insert(key, incoming);
                }
            }
        }
    }

    /// Merges the translation file at `path`. A missing file is ignored.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or parsed. The
    /// table is left untouched in that case.
    pub fn merge_file(&mut self, path: &Path, policy: MergePolicy) -> Result<(), LoadError> {
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "Translation file to merge not found");
            return Ok(());
        }

        let new_entries = load_entries_file(path)?;
        self.merge_entries(new_entries, policy);

        Ok(())
    }

    /// Merges every translation file found under `root`, in path order.
    ///
    /// Returns the number of files merged. Stops at the first file that
    /// fails to load; files merged before it stay merged.
    pub fn merge_discovered(
        &mut self,
        root: &Path,
        config: &TranslationFilesConfig,
        policy: MergePolicy,
    ) -> Result<usize, LoadError> {
        let files = discover_translation_files(root, config)?;
        for file in &files {
            self.merge_file(file, policy)?;
        }

        Ok(files.len())
    }

    /// Forgets all entries and restores the default locale settings.
    ///
    /// The next access loads the table again from scratch.
    pub fn reset(&mut self) {
        self.default_locale = DEFAULT_LOCALE.to_string();
        self.fallback_locales = vec![DEFAULT_LOCALE.to_string()];
        self.source_file = None;
        self.entries = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use std::cell::Cell;
    use std::fs;
    use std::path::Path;

    use googletest::prelude::*;
    use rstest::*;
    use tempfile::TempDir;

    use super::*;
    use crate::loader::{
        StaticLoader,
        loader_fn,
    };
    use crate::test_utils::{
        entries,
        test_table,
    };

    fn incoming() -> Entries {
        entries(&[
            ("testKey", &[("de", "X"), ("en", "Y"), ("fr", "Z")]),
            ("testKey2", &[("de", "newTestValue2-DE"), ("en", "newTestValue2-EN")]),
        ])
    }

    #[rstest]
    #[case::default_locale(None, "testValue-EN")]
    #[case::explicit_locale(Some("de"), "testValue-DE")]
    #[case::empty_locale_is_default(Some(""), "testValue-EN")]
    #[case::unknown_locale_uses_fallback(Some("ja"), "testValue-EN")]
    fn test_lookup_or_key(#[case] locale: Option<&str>, #[case] expected: &str) {
        let mut table = test_table();

        assert_eq!(table.lookup_or_key("testKey", locale).as_deref(), Some(expected));
    }

    #[googletest::test]
    fn test_lookup_missing_key() {
        let mut table = test_table();

        expect_that!(table.lookup_or_key("testKey2", None), some(eq("testKey2")));
        expect_that!(table.lookup_or_key("testKey2", Some("de")), some(eq("testKey2")));
        expect_that!(table.lookup_or_nil("testKey2", None), none());
        expect_that!(table.lookup_or_nil("testKey", Some("de")), some(eq("testValue-DE")));
    }

    #[googletest::test]
    fn test_lookup_empty_key() {
        let mut table = TranslationTable::new(loader_fn(|_| panic!("must not load")));

        expect_that!(table.lookup_or_key("", None), none());
        expect_that!(table.lookup_or_nil("", None), none());
        expect_that!(table.resolve("", None, &[]), none());
        expect_that!(table.is_loaded(), eq(false));
    }

    #[googletest::test]
    fn test_lookup_text_entry_ignores_locale() {
        let mut table = TranslationTable::new(StaticLoader(
            [("brand".to_string(), Entry::from("Acme"))].into_iter().collect(),
        ));

        expect_that!(table.lookup_or_key("brand", Some("de")), some(eq("Acme")));
        expect_that!(table.lookup_or_nil("brand", Some("fr")), some(eq("Acme")));
    }

    #[googletest::test]
    fn test_lookup_value_equal_to_key_counts_as_missing() {
        let mut table =
            TranslationTable::new(StaticLoader(entries(&[("OK", &[("en", "OK"), ("de", "Gut")])])));

        expect_that!(table.lookup_or_nil("OK", None), none());
        expect_that!(table.lookup_or_nil("OK", Some("de")), some(eq("Gut")));
    }

    #[googletest::test]
    fn test_lookup_fallback_chain_order() {
        let mut table = TranslationTable::new(StaticLoader(entries(&[(
            "title",
            &[("it", "Titolo"), ("es", "Título"), ("fr", "Titre")],
        )])));
        table.set_fallback_locales(["de", "fr", "es"]);

        expect_that!(table.lookup_or_key("title", Some("ja")), some(eq("Titre")));

        table.set_fallback_locales(["es", "fr"]);
        expect_that!(table.lookup_or_key("title", Some("ja")), some(eq("Título")));

        table.set_fallback_locales(["pt"]);
        expect_that!(table.lookup_or_key("title", Some("ja")), some(eq("Titolo")));
    }

    #[googletest::test]
    fn test_lookup_default_locale_used_when_absent() {
        let mut table = test_table();
        table.set_default_locale("de");

        expect_that!(table.default_locale(), eq("de"));
        expect_that!(table.lookup_or_key("testKey", None), some(eq("testValue-DE")));
    }

    #[googletest::test]
    fn test_lookup_bundle_bypasses_table() {
        let loads = Cell::new(0);
        let mut table = TranslationTable::new(loader_fn(|_| {
            loads.set(loads.get() + 1);
            Ok(None)
        }));
        let bundle = Entry::localized([("en", "Hello"), ("de", "Hallo")]);
        let empty_bundle = Entry::localized(Vec::<(String, String)>::new());

        expect_that!(table.lookup_or_key(&bundle, Some("de")), some(eq("Hallo")));
        expect_that!(table.lookup_or_nil(&bundle, Some("fr")), some(eq("Hello")));
        expect_that!(table.lookup_or_key(&Entry::from("plain"), None), some(eq("plain")));
        expect_that!(table.lookup_or_key(&empty_bundle, None), none());
        expect_that!(loads.get(), eq(0));
    }

    #[googletest::test]
    fn test_resolve_formats_value() {
        let mut table = TranslationTable::new(StaticLoader(entries(&[(
            "inbox",
            &[("en", "%s has %d new messages"), ("de", "%2$d neue Nachrichten für %1$s")],
        )])));

        expect_that!(
            table.resolve("inbox", None, &["Ada".into(), 3.into()]),
            some(eq("Ada has 3 new messages"))
        );
        expect_that!(
            table.resolve("inbox", Some("de"), &["Ada".into(), 3.into()]),
            some(eq("3 neue Nachrichten für Ada"))
        );
        expect_that!(table.resolve("missing %s", None, &["key".into()]), some(eq("missing key")));
    }

    #[googletest::test]
    fn test_resolve_numeric_conversions() {
        let mut table = TranslationTable::new(StaticLoader(entries(&[
            ("total", &[("en", "Total: %.2f EUR"), ("de", "Summe: %08.2f EUR")]),
            ("items", &[("en", "%d items (#%04x)")]),
        ])));

        expect_that!(
            table.resolve("total", None, &[12.3456.into()]),
            some(eq("Total: 12.35 EUR"))
        );
        expect_that!(
            table.resolve("total", Some("de"), &[12.3456.into()]),
            some(eq("Summe: 00012.35 EUR"))
        );
        expect_that!(
            table.resolve("items", None, &[2.7.into(), 255.into()]),
            some(eq("2 items (#00ff)"))
        );
    }

    #[googletest::test]
    fn test_lookup_empty_text_same_for_key_and_bundle() {
        let mut table = TranslationTable::new(StaticLoader(
            [("blank".to_string(), Entry::from(""))].into_iter().collect(),
        ));
        let blank = Entry::from("");

        expect_that!(table.lookup_or_key("blank", None), none());
        expect_that!(table.lookup_or_key(&blank, None), none());
        expect_that!(table.lookup_or_nil("blank", None), none());
        expect_that!(table.resolve("blank", None, &[]), none());
    }

    #[googletest::test]
    fn test_get_entry_loads_once() {
        let loads = Cell::new(0);
        let mut table = TranslationTable::new(loader_fn(|_| {
            loads.set(loads.get() + 1);
            Ok(Some(entries(&[("testKey", &[("en", "testValue-EN")])])))
        }));

        expect_that!(table.is_loaded(), eq(false));
        expect_that!(table.get_entry("testKey"), some(eq(&Entry::localized([("en", "testValue-EN")]))));
        expect_that!(table.get_entry("other"), none());
        table.lookup_or_key("testKey", None);
        expect_that!(loads.get(), eq(1));
    }

    #[googletest::test]
    fn test_loader_receives_source_file() {
        let mut table = TranslationTable::new(loader_fn(|source: Option<&Path>| {
            assert_eq!(source, Some(Path::new("/srv/i18n.json")));
            Ok(None)
        }));
        table.set_source_file(Some(PathBuf::from("/srv/i18n.json")));

        expect_that!(table.load(), ok(anything()));
        expect_that!(table.source_file(), some(eq(Path::new("/srv/i18n.json"))));
    }

    #[googletest::test]
    fn test_load_error_leaves_table_loaded_and_empty() {
        let mut table = TranslationTable::new(loader_fn(|_| {
            Err(LoadError::Syntax { path: PathBuf::from("i18n.json"), message: "broken".into() })
        }));

        let result = table.load();

        expect_that!(matches!(result, Err(LoadError::Syntax { .. })), eq(true));
        expect_that!(table.is_loaded(), eq(true));
        expect_that!(table.entries().is_empty(), eq(true));
        expect_that!(table.load(), ok(anything()));
    }

    #[googletest::test]
    fn test_lazy_load_error_degrades_to_passthrough() {
        let mut table = TranslationTable::new(loader_fn(|_| {
            Err(LoadError::Syntax { path: PathBuf::from("i18n.json"), message: "broken".into() })
        }));

        expect_that!(table.lookup_or_key("testKey", None), some(eq("testKey")));
        expect_that!(table.lookup_or_nil("testKey", None), none());
    }

    #[googletest::test]
    fn test_merge_with_override() {
        let mut table = test_table();

        table.merge_entries(incoming(), MergePolicy::Override);

        expect_that!(table.lookup_or_key("testKey", None), some(eq("Y")));
        expect_that!(table.lookup_or_key("testKey", Some("de")), some(eq("X")));
        expect_that!(table.lookup_or_key("testKey", Some("fr")), some(eq("Z")));
        expect_that!(table.lookup_or_key("testKey2", None), some(eq("newTestValue2-EN")));
        expect_that!(table.lookup_or_key("testKey2", Some("de")), some(eq("newTestValue2-DE")));
    }

    #[googletest::test]
    fn test_merge_without_override() {
        let mut table = test_table();

        table.merge_entries(incoming(), MergePolicy::KeepExisting);

        expect_that!(table.lookup_or_key("testKey", None), some(eq("testValue-EN")));
        expect_that!(table.lookup_or_key("testKey", Some("de")), some(eq("testValue-DE")));
        expect_that!(table.lookup_or_key("testKey", Some("fr")), some(eq("Z")));
        expect_that!(table.lookup_or_key("testKey2", None), some(eq("newTestValue2-EN")));
    }

    #[googletest::test]
    fn test_merge_is_idempotent() {
        let mut once = test_table();
        once.merge_entries(incoming(), MergePolicy::Override);

        let mut twice = test_table();
        twice.merge_entries(incoming(), MergePolicy::Override);
        twice.merge_entries(incoming(), MergePolicy::Override);

        expect_that!(twice.entries(), eq(once.entries()));
    }

    #[googletest::test]
    fn test_merge_loads_before_merging() {
        let mut table = test_table();

        table.merge_entries(entries(&[("other", &[("en", "Other")])]), MergePolicy::Override);

        expect_that!(table.lookup_or_key("testKey", None), some(eq("testValue-EN")));
        expect_that!(table.lookup_or_key("other", None), some(eq("Other")));
    }

    #[googletest::test]
    fn test_merge_empty_does_not_load() {
        let mut table = test_table();

        table.merge_entries(Entries::new(), MergePolicy::Override);

        expect_that!(table.is_loaded(), eq(false));
    }

    #[googletest::test]
    fn test_merge_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("extra.json");
        fs::write(&path, r#"{"testKey": {"fr": "testValue-FR"}}"#).unwrap();
        let mut table = test_table();

        expect_that!(table.merge_file(&path, MergePolicy::default()), ok(anything()));
        expect_that!(table.lookup_or_key("testKey", Some("fr")), some(eq("testValue-FR")));
        expect_that!(table.lookup_or_key("testKey", Some("de")), some(eq("testValue-DE")));
    }

    #[googletest::test]
    fn test_merge_file_missing_is_noop() {
        let mut table = test_table();

        let result = table.merge_file(Path::new("/no/such/extra.json"), MergePolicy::Override);

        expect_that!(result, ok(anything()));
        expect_that!(table.is_loaded(), eq(false));
    }

    #[googletest::test]
    fn test_merge_file_broken_leaves_table_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("extra.json");
        fs::write(&path, r#"{"testKey": 1}"#).unwrap();
        let mut table = test_table();
        let before = table.entries().clone();

        let result = table.merge_file(&path, MergePolicy::Override);

        expect_that!(matches!(result, Err(LoadError::Shape { .. })), eq(true));
        expect_that!(table.entries(), eq(&before));
    }

    #[googletest::test]
    fn test_merge_discovered() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("a/i18n")).unwrap();
        fs::create_dir_all(root.join("b/i18n")).unwrap();
        fs::write(root.join("a/i18n/x.json"), r#"{"shared": {"en": "from-a"}}"#).unwrap();
        fs::write(root.join("b/i18n/y.json"), r#"{"shared": {"en": "from-b", "de": "von-b"}}"#)
            .unwrap();
        let mut table = test_table();

        let merged = table
            .merge_discovered(root, &TranslationFilesConfig::default(), MergePolicy::KeepExisting)
            .unwrap();

        expect_that!(merged, eq(2));
        expect_that!(table.lookup_or_key("shared", None), some(eq("from-a")));
        expect_that!(table.lookup_or_key("shared", Some("de")), some(eq("von-b")));
    }

    #[googletest::test]
    fn test_reset_restores_defaults_and_reloads() {
        let loads = Cell::new(0);
        let mut table = TranslationTable::new(loader_fn(|_| {
            loads.set(loads.get() + 1);
            Ok(Some(entries(&[("testKey", &[("en", "testValue-EN")])])))
        }));
        table.set_default_locale("de");
        table.set_fallback_locales(["fr"]);
        table.set_source_file(Some(PathBuf::from("/srv/i18n.json")));
        table.merge_entries(entries(&[("testKey", &[("en", "merged")])]), MergePolicy::Override);
        expect_that!(table.lookup_or_key("testKey", Some("en")), some(eq("merged")));

        table.reset();

        expect_that!(table.is_loaded(), eq(false));
        expect_that!(table.default_locale(), eq("en"));
        expect_that!(table.fallback_locales(), elements_are![eq("en")]);
        expect_that!(table.source_file(), none());
        expect_that!(table.lookup_or_key("testKey", None), some(eq("testValue-EN")));
        expect_that!(loads.get(), eq(2));
    }

    #[googletest::test]
    fn test_from_settings() {
        let settings = I18nSettings {
            default_locale: "de".to_string(),
            fallback_locales: vec!["fr".to_string(), "en".to_string()],
            source_file: Some(PathBuf::from("/srv/i18n.json")),
            search_roots: vec![PathBuf::from("/srv/www")],
            ..I18nSettings::default()
        };

        let table = TranslationTable::from_settings(&settings);

        expect_that!(table.default_locale(), eq("de"));
        expect_that!(table.fallback_locales(), elements_are![eq("fr"), eq("en")]);
        expect_that!(table.source_file(), some(eq(Path::new("/srv/i18n.json"))));
        expect_that!(table.loader().roots(), elements_are![eq(Path::new("/srv/www"))]);
    }
}
