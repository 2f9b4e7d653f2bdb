//! What a lookup is performed on.

use crate::input::translation::Entry;

/// Either a key to look up in the table, or an already resolved bundle.
///
/// Callers decide up front which one they hold; the table never guesses from
/// the shape of the value.
///
/// # Examples
/// ```
/// use tg_i18n::Lookup;
/// use tg_i18n::input::translation::Entry;
///
/// let by_key = Lookup::from("greeting");
/// let bundle = Entry::localized([("en", "Hello")]);
/// let by_bundle = Lookup::from(&bundle);
///
/// assert_eq!(by_key.as_key(), Some("greeting"));
/// assert_eq!(by_bundle.as_key(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// Resolved through the translation table.
    Key(&'a str),
    /// Used as is, bypassing the table.
    Bundle(&'a Entry),
}

impl<'a> Lookup<'a> {
    /// An empty key or bundle never resolves to anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Key(key) => key.is_empty(),
            Self::Bundle(entry) => entry.is_empty(),
        }
    }

    #[must_use]
    pub const fn as_key(&self) -> Option<&'a str> {
        match self {
            Self::Key(key) => Some(*key),
            Self::Bundle(_) => None,
        }
    }
}

impl<'a> From<&'a str> for Lookup<'a> {
    fn from(key: &'a str) -> Self {
        Self::Key(key)
    }
}

impl<'a> From<&'a String> for Lookup<'a> {
    fn from(key: &'a String) -> Self {
        Self::Key(key)
    }
}

impl<'a> From<&'a Entry> for Lookup<'a> {
    fn from(entry: &'a Entry) -> Self {
        Self::Bundle(entry)
    }
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::*;

    #[rstest]
    #[case::empty_key(Lookup::Key(""), true)]
    #[case::key(Lookup::Key("greeting"), false)]
    fn test_is_empty_key(#[case] lookup: Lookup<'_>, #[case] expected: bool) {
        assert_eq!(lookup.is_empty(), expected);
    }

    #[rstest]
    fn test_is_empty_bundle() {
        let empty = Entry::localized(Vec::<(String, String)>::new());
        let text = Entry::from("Acme");

        assert!(Lookup::from(&empty).is_empty());
        assert!(!Lookup::from(&text).is_empty());
    }

    #[rstest]
    fn test_from_string_is_key() {
        let key = String::from("greeting");
        assert_eq!(Lookup::from(&key), Lookup::Key("greeting"));
    }
}
