use std::path::{
    Path,
    PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "fallbackLocales[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Locale used when a lookup names none.
pub const DEFAULT_LOCALE: &str = "en";

/// Name of the translation table probed under each search root.
pub const DEFAULT_FILE_NAME: &str = "i18n.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct I18nSettings {
    pub default_locale: String,

    /// Tried in order when the requested locale has no value.
    pub fallback_locales: Vec<String>,

    /// Explicit translation table, probed before any search root.
    pub source_file: Option<PathBuf>,

    /// File name looked up under each of `search_roots`.
    pub file_name: String,

    /// Directories probed for `file_name`, highest priority first.
    pub search_roots: Vec<PathBuf>,

    pub translation_files: TranslationFilesConfig,
}

/// Which files under a directory count as additional translation tables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationFilesConfig {
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

impl I18nSettings {
    /// # Errors
    /// - Required field is empty
    /// - File name is a path
    /// - Invalid glob pattern
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.default_locale.is_empty() {
            errors.push(ValidationError::new(
                "defaultLocale",
                "The locale cannot be empty. Please specify a locale, for example: \"en\"",
            ));
        }

        for (index, locale) in self.fallback_locales.iter().enumerate() {
            if locale.is_empty() {
                errors.push(ValidationError::new(
                    format!("fallbackLocales[{index}]"),
                    "The locale cannot be empty. Please remove the entry or specify a locale",
                ));
            }
        }

        if self.file_name.is_empty() {
            errors.push(ValidationError::new(
                "fileName",
                "The file name cannot be empty. Example: \"i18n.json\"",
            ));
        } else if Path::new(&self.file_name).components().count() != 1 {
            errors.push(ValidationError::new(
                "fileName",
                format!(
                    "'{}' is a path. Please use 'searchRoots' for directories and keep only the file name here",
                    self.file_name
                ),
            ));
        }

        errors.extend(self.translation_files.validate());

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl TranslationFilesConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.include_patterns.is_empty() {
            errors.push(ValidationError::new(
                "translationFiles.includePatterns",
                "At least one pattern is required. Example: [\"**/i18n/*.json\"]",
            ));
        }

        for (index, pattern) in self.include_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("translationFiles.includePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        for (index, pattern) in self.exclude_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("translationFiles.excludePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        errors
    }
}

impl Default for TranslationFilesConfig {
    fn default() -> Self {
        Self {
            include_patterns: vec!["**/i18n/*.json".to_string()],
            exclude_patterns: vec!["target/**".to_string(), "node_modules/**".to_string()],
        }
    }
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            default_locale: DEFAULT_LOCALE.to_string(),
            fallback_locales: vec![DEFAULT_LOCALE.to_string()],
            source_file: None,
            file_name: DEFAULT_FILE_NAME.to_string(),
            search_roots: Vec::new(),
            translation_files: TranslationFilesConfig::default(),
        }
    }
}
