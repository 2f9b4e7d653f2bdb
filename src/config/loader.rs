//! Settings file loading.

use std::path::Path;

use super::{
    ConfigError,
    I18nSettings,
};

/// Name of the settings file.
pub const CONFIG_FILE_NAME: &str = ".tg-i18n.json";

/// Reads `.tg-i18n.json` from a directory.
///
/// # Arguments
/// * `workspace_root` - Directory to look in
///
/// # Returns
/// - `Ok(Some(settings))`: The file was found and parsed
/// - `Ok(None)`: There is no settings file
/// - `Err(ConfigError)`: The file could not be read or parsed
pub(super) fn load_from_workspace(
    workspace_root: &Path,
) -> Result<Option<I18nSettings>, ConfigError> {
    let config_path = workspace_root.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)?;
    let settings: I18nSettings = serde_json::from_str(&content)?;

    Ok(Some(settings))
}

/// Loads and validates settings.
///
/// Defaults are used when there is no settings file.
///
/// # Errors
/// - The file cannot be read
/// - The file is not valid JSON
/// - The settings fail validation
pub fn load_settings(workspace_root: Option<&Path>) -> Result<I18nSettings, ConfigError> {
    tracing::debug!("Loading settings for workspace: {:?}", workspace_root);

    let settings = match workspace_root {
        Some(root) => load_from_workspace(root)?.map_or_else(I18nSettings::default, |ws| {
            tracing::debug!("Loaded workspace settings: {:?}", ws);
            ws
        }),
        None => I18nSettings::default(),
    };

    settings.validate().map_err(ConfigError::ValidationErrors)?;
    tracing::debug!("Settings loaded successfully: {:?}", settings);

    Ok(settings)
}
