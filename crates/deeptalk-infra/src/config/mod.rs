//! On-disk session configuration.
//!
//! The config lives at `~/.deeptalk/config.toml`. A missing file is
//! created with defaults on first load; a partial file materializes
//! field-wise through the serde defaults on
//! [`SessionConfig`]. Unknown keys in the file are ignored.

use std::path::{Path, PathBuf};

use tracing::info;

use deeptalk_types::config::SessionConfig;
use deeptalk_types::error::ConfigError;

/// Directory under the home directory holding DeepTalk state.
const APP_DIR: &str = ".deeptalk";

/// Config file name inside [`APP_DIR`].
const CONFIG_FILE: &str = "config.toml";

/// Resolve the platform config file path.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(APP_DIR).join(CONFIG_FILE))
}

/// Load the configuration from the default location, creating it with
/// defaults on first run.
pub fn load() -> Result<SessionConfig, ConfigError> {
    load_from(&config_path()?)
}

/// Persist the configuration to the default location.
pub fn save(config: &SessionConfig) -> Result<(), ConfigError> {
    save_to(&config_path()?, config)
}

/// Load the configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<SessionConfig, ConfigError> {
    if !path.exists() {
        let config = SessionConfig::default();
        save_to(path, &config)?;
        info!(path = %path.display(), "wrote default configuration");
        return Ok(config);
    }

    let raw = std::fs::read_to_string(path)?;
    toml::from_str(&raw).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Persist the configuration to an explicit path, creating parent
/// directories as needed.
pub fn save_to(path: &Path, config: &SessionConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized =
        toml::to_string_pretty(config).map_err(|e| ConfigError::Parse(e.to_string()))?;
    std::fs::write(path, serialized)?;
    Ok(())
}

/// Apply a `key = value` update from the command line.
///
/// Key names match the toml field names. An empty value clears the
/// optional `api_key`.
pub fn set_value(config: &mut SessionConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    fn invalid(key: &str, reason: impl Into<String>) -> ConfigError {
        ConfigError::InvalidValue {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    match key {
        "api_endpoint" => config.api_endpoint = value.to_string(),
        "model" => config.model = value.to_string(),
        "temperature" => {
            config.temperature = value
                .parse::<f64>()
                .map_err(|e| invalid(key, e.to_string()))?;
        }
        "top_p" => {
            config.top_p = value
                .parse::<f64>()
                .map_err(|e| invalid(key, e.to_string()))?;
        }
        "max_context" => {
            config.max_context = value
                .parse::<usize>()
                .map_err(|e| invalid(key, e.to_string()))?;
        }
        "api_key" => {
            config.api_key = if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            };
        }
        "debug" => {
            config.debug = value
                .parse::<bool>()
                .map_err(|e| invalid(key, e.to_string()))?;
        }
        "prepend_think" => {
            config.prepend_think = value
                .parse::<bool>()
                .map_err(|e| invalid(key, e.to_string()))?;
        }
        other => return Err(ConfigError::UnknownKey(other.to_string())),
    }
    Ok(())
}
