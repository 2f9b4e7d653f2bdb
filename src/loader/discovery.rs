//! Discovery of additional translation files below a directory.

use std::path::{
    Path,
    PathBuf,
};

use ignore::WalkBuilder;

use super::LoadError;
use crate::config::{
    FileMatcher,
    TranslationFilesConfig,
};

/// Finds translation files under `root`.
///
/// Paths are matched relative to `root`. `.gitignore` rules are honoured.
/// The result is sorted so that merging the files is reproducible.
pub fn discover_translation_files(
    root: &Path,
    config: &TranslationFilesConfig,
) -> Result<Vec<PathBuf>, LoadError> {
    tracing::debug!(root = %root.display(), "Discovering translation files");
    let matcher = FileMatcher::new(root.to_path_buf(), config)?;

    let mut found_files = Vec::new();
    for result in WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(true)
        .require_git(false)
        .follow_links(false)
        .build()
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(?err, "Failed to read directory entry");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        if matcher.is_translation_file(entry.path()) {
            found_files.push(entry.into_path());
        }
    }

    found_files.sort();
    tracing::debug!(count = found_files.len(), "Translation files discovered");

    Ok(found_files)
}
