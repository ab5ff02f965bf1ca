//! Configuration management.
//!
//! Settings live under the `"http-probe"` key of a JSON document. Missing
//! fields take their defaults; the result is validated and stored in a
//! process-wide singleton that the executor reads when no explicit
//! configuration is passed.

pub mod schema;

pub use schema::ProbeConfig;

use once_cell::sync::Lazy;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Key under which settings are read from a JSON document.
pub const SETTINGS_KEY: &str = "http-probe";

/// Global configuration instance.
static CONFIG: Lazy<RwLock<ProbeConfig>> = Lazy::new(|| RwLock::new(ProbeConfig::default()));

/// Errors raised while loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The settings file could not be read.
    Io { path: PathBuf, source: std::io::Error },

    /// The settings file is not valid JSON.
    Syntax { path: PathBuf, message: String },

    /// A setting has an unacceptable value.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            ConfigError::Syntax { path, message } => {
                write!(f, "Invalid JSON in {}: {}", path.display(), message)
            }
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Loads configuration from a JSON settings value.
///
/// Reads the `"http-probe"` object if present; fields it leaves out take
/// their defaults.
/// Settings that fail to deserialize are logged and ignored; settings that
/// deserialize but fail validation are an error. On success the global
/// configuration is replaced.
///
/// # Example
///
/// ```no_run
/// use http_probe::config::load_config;
/// use serde_json::json;
///
/// let settings = json!({
///     "http-probe": {
///         "baseUrl": "http://127.0.0.1:9000",
///         "timeout": 5000
///     }
/// });
///
/// let config = load_config(Some(settings)).unwrap();
/// assert_eq!(config.timeout, 5000);
/// ```
pub fn load_config(settings_json: Option<Value>) -> Result<ProbeConfig, ConfigError> {
    let mut config = ProbeConfig::default();

    if let Some(settings) = settings_json {
        if let Some(probe_settings) = settings.get(SETTINGS_KEY) {
            match serde_json::from_value::<ProbeConfig>(probe_settings.clone()) {
                Ok(user_config) => config = user_config,
                Err(e) => {
                    log::warn!(
                        "Failed to parse {} settings: {}. Using defaults.",
                        SETTINGS_KEY,
                        e
                    );
                }
            }
        }
    }

    config.validate().map_err(ConfigError::Invalid)?;

    if let Ok(mut global_config) = CONFIG.write() {
        *global_config = config.clone();
    }

    Ok(config)
}

/// Loads configuration from a JSON file on disk.
///
/// See [`load_config`] for how the document is interpreted.
pub fn load_config_file(path: &Path) -> Result<ProbeConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&text).map_err(|e| ConfigError::Syntax {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    log::debug!("Loaded settings from {}", path.display());
    load_config(Some(value))
}

/// Gets a clone of the current global configuration.
pub fn get_config() -> ProbeConfig {
    CONFIG
        .read()
        .map(|c| c.clone())
        .unwrap_or_else(|_| ProbeConfig::default())
}

/// Updates the global configuration in place.
///
/// If the result does not validate, the configuration reverts to defaults
/// and the validation error is returned.
///
/// # Example
///
/// ```no_run
/// use http_probe::config::update_config;
///
/// update_config(|config| {
///     config.timeout = 60000;
/// })
/// .unwrap();
/// ```
pub fn update_config<F>(updater: F) -> Result<(), ConfigError>
where
    F: FnOnce(&mut ProbeConfig),
{
    if let Ok(mut config) = CONFIG.write() {
        updater(&mut config);

        if let Err(e) = config.validate() {
            log::warn!("Configuration validation failed after update: {}", e);
            *config = ProbeConfig::default();
            return Err(ConfigError::Invalid(e));
        }
    }
    Ok(())
}

/// Resets the configuration to defaults.
pub fn reset_config() {
    if let Ok(mut config) = CONFIG.write() {
        *config = ProbeConfig::default();
    }
}
