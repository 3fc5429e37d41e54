use crate::game_logic::errors::{LedgeError, LedgeResult, describe_validation_errors};
use crate::resources::NavigationConfig;
use bevy::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use validator::Validate;

pub mod range_types;

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|path| path.join("ledge").join("config.toml"))
}

/// Load the user config, falling back to defaults when it is missing or bad
pub fn load_config() -> NavigationConfig {
    let Some(config_path) = get_config_path() else {
        return NavigationConfig::default();
    };
    if !config_path.exists() {
        return NavigationConfig::default();
    }

    match load_config_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring config at {}: {}", config_path.display(), e);
            NavigationConfig::default()
        }
    }
}

pub fn load_config_from(path: &Path) -> LedgeResult<NavigationConfig> {
    let contents = fs::read_to_string(path)?;
    let config: NavigationConfig = toml::from_str(&contents)?;
    config
        .validate()
        .map_err(|errors| LedgeError::ConfigValidationFailed {
            reason: describe_validation_errors(&errors),
        })?;
    Ok(config)
}

pub fn save_config(config: &NavigationConfig) -> LedgeResult<()> {
    let config_path = get_config_path().ok_or(LedgeError::ConfigDirNotFound)?;
    save_config_to(config, &config_path)
}

pub fn save_config_to(config: &NavigationConfig, path: &Path) -> LedgeResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents)?;
    Ok(())
}
