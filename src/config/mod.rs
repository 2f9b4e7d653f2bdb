//! Settings for the translation table and its loaders.
/// Config file loader
mod loader;
/// Translation file pattern matcher
mod matcher;
/// Configuration types and settings
mod types;

pub use loader::{
    CONFIG_FILE_NAME,
    load_settings,
};
pub use matcher::{
    FileMatcher,
    MatcherError,
};
pub use types::{
    ConfigError,
    DEFAULT_FILE_NAME,
    DEFAULT_LOCALE,
    I18nSettings,
    TranslationFilesConfig,
    ValidationError,
};
