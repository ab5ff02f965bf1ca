//! HTTP request execution configuration.

use crate::config::{get_config, ProbeConfig};
use std::collections::HashMap;
use std::time::Duration;

/// Settings that control how a single request is executed.
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    /// Bound on the whole request, including connect and body download.
    pub timeout: Duration,

    /// Whether to follow 3xx responses.
    pub follow_redirects: bool,

    /// Redirect limit when following.
    pub max_redirects: u32,

    /// Whether to validate TLS certificates.
    pub validate_ssl: bool,

    /// Headers added unless the request sets them itself.
    pub default_headers: HashMap<String, String>,
}

impl ExecutionConfig {
    /// Creates a config with the given timeout and no default headers.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            follow_redirects: true,
            max_redirects: 10,
            validate_ssl: true,
            default_headers: HashMap::new(),
        }
    }

    /// Creates an ExecutionConfig from the global configuration.
    pub fn from_global_config() -> Self {
        Self::from(&get_config())
    }
}

impl From<&ProbeConfig> for ExecutionConfig {
    fn from(config: &ProbeConfig) -> Self {
        Self {
            timeout: config.timeout_duration(),
            follow_redirects: config.follow_redirects,
            max_redirects: config.max_redirects,
            validate_ssl: config.validate_ssl,
            default_headers: config.default_headers.clone(),
        }
    }
}

impl Default for ExecutionConfig {
    /// Reads settings from the global configuration.
    fn default() -> Self {
        Self::from_global_config()
    }
}
