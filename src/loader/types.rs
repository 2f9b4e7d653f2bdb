//! Loader type definitions.

use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

use crate::config::MatcherError;
use crate::input::translation::Entries;

#[derive(Error, Debug)]
pub enum LoadError {
    /// Error when failing to read a translation file
    #[error("Failed to read translation file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Error when a translation file is not valid JSON
    #[error("Failed to parse translation file '{}': {message}", .path.display())]
    Syntax { path: PathBuf, message: String },
    /// Error when a translation file is JSON but not a translation table
    #[error("Invalid translation table in '{}': {source}", .path.display())]
    Shape {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Matcher(#[from] MatcherError),
}

/// Supplies the initial translation table.
///
/// `source_file` is the table's explicitly configured file, if any.
/// Implementations return `Ok(None)` when there is nothing to load.
pub trait Loader {
    fn load(&self, source_file: Option<&Path>) -> Result<Option<Entries>, LoadError>;
}

/// Hands out a fixed table on every load.
#[derive(Debug, Clone, Default)]
pub struct StaticLoader(pub Entries);

impl Loader for StaticLoader {
    fn load(&self, _source_file: Option<&Path>) -> Result<Option<Entries>, LoadError> {
        Ok(Some(self.0.clone()))
    }
}

/// Adapts a closure into a [`Loader`].
#[derive(Clone, Copy)]
pub struct FnLoader<F> {
    f: F,
}

impl<F> std::fmt::Debug for FnLoader<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnLoader").finish_non_exhaustive()
    }
}

impl<F> Loader for FnLoader<F>
where
    F: Fn(Option<&Path>) -> Result<Option<Entries>, LoadError>,
{
    fn load(&self, source_file: Option<&Path>) -> Result<Option<Entries>, LoadError> {
        (self.f)(source_file)
    }
}

/// Returns a [`Loader`] that calls `f`.
///
/// # Examples
/// ```
/// use tg_i18n::loader::{Loader, loader_fn};
///
/// let loader = loader_fn(|_| Ok(None));
/// assert!(loader.load(None).unwrap().is_none());
/// ```
pub const fn loader_fn<F>(f: F) -> FnLoader<F>
where
    F: Fn(Option<&Path>) -> Result<Option<Entries>, LoadError>,
{
    FnLoader { f }
}

impl<L: Loader + ?Sized> Loader for &L {
    fn load(&self, source_file: Option<&Path>) -> Result<Option<Entries>, LoadError> {
        (**self).load(source_file)
    }
}

impl<L: Loader + ?Sized> Loader for Box<L> {
    fn load(&self, source_file: Option<&Path>) -> Result<Option<Entries>, LoadError> {
        (**self).load(source_file)
    }
}
