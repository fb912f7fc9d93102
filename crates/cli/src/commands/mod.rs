//! CLI command implementations.

pub mod doctor;
pub mod evaluate;
pub mod investigate;
pub mod judge;
pub mod onboard;
pub mod prompt;
pub mod retrieve;

use std::path::{Path, PathBuf};

use investigator_config::{AppConfig, ConfigError};

/// The config file in use: `--config` if given, else the default path.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit.map(Path::to_path_buf).unwrap_or_else(AppConfig::config_path)
}

/// Load config from `--config` or the default path, then apply env overrides.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let Some(path) = explicit else {
        return AppConfig::load();
    };
    let mut config = AppConfig::load_from(path)?;
    config.apply_env_overrides(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}

pub fn read_text(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()).into())
}
