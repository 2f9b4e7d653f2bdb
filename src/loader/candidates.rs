//! Loading the initial table from the first existing candidate file.

use std::path::{
    Path,
    PathBuf,
};

use super::{
    LoadError,
    Loader,
};
use crate::config::{
    DEFAULT_FILE_NAME,
    I18nSettings,
};
use crate::input::translation::{
    Entries,
    load_entries_file,
};

/// Environment variables naming deployment roots, highest priority first.
const ROOT_ENV_VARS: [&str; 2] = ["CONTEXT_DOCUMENT_ROOT", "DOCUMENT_ROOT"];

/// Probes candidate paths in priority order and loads the first that exists.
///
/// # Candidate order
/// 1. the table's explicit source file
/// 2. `<root>/<file_name>` for each search root, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLoader {
    file_name: String,
    roots: Vec<PathBuf>,
}

impl Default for CandidateLoader {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_NAME)
    }
}

impl CandidateLoader {
    /// Creates a loader without search roots; only the source file is probed.
    #[must_use]
    pub fn new(file_name: impl Into<String>) -> Self {
        Self { file_name: file_name.into(), roots: Vec::new() }
    }

    /// Appends a search root with the lowest priority so far.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    /// Builds the deployment chain from the process environment.
    ///
    /// Roots: `CONTEXT_DOCUMENT_ROOT`, `DOCUMENT_ROOT`, then the directory of
    /// the running executable. Unset or empty variables are skipped.
    #[must_use]
    pub fn from_env(file_name: impl Into<String>) -> Self {
        let env_roots = ROOT_ENV_VARS
            .iter()
            .filter_map(|name| std::env::var_os(name))
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));

        let loader = env_roots
            .chain(exe_dir)
            .fold(Self::new(file_name), Self::with_root);
        tracing::debug!(roots = ?loader.roots, "Candidate roots from environment");
        loader
    }

    #[must_use]
    pub fn from_settings(settings: &I18nSettings) -> Self {
        settings
            .search_roots
            .iter()
            .fold(Self::new(settings.file_name.clone()), |loader, root| loader.with_root(root))
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// All candidate paths in probing order.
    #[must_use]
    pub fn candidates(&self, source_file: Option<&Path>) -> Vec<PathBuf> {
        source_file
            .map(Path::to_path_buf)
            .into_iter()
            .chain(self.roots.iter().map(|root| root.join(&self.file_name)))
            .collect()
    }
}

impl Loader for CandidateLoader {
    fn load(&self, source_file: Option<&Path>) -> Result<Option<Entries>, LoadError> {
        let Some(found) = self.candidates(source_file).into_iter().find(|path| {
            let exists = path.is_file();
            tracing::debug!(path = %path.display(), exists, "Probing translation candidate");
            exists
        }) else {
            tracing::debug!("No translation candidate found");
            return Ok(None);
        };

        load_entries_file(&found).map(Some)
    }
}
