//! Configuration schema for http-probe.
//!
//! This module defines the configuration structure and validation logic for all
//! user-configurable settings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Main configuration structure.
///
/// Read from the `"http-probe"` key of a JSON settings file. Missing settings
/// fall back to defaults that target the example server on localhost.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeConfig {
    /// Base URL of the server under test. Suite paths are joined onto it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in milliseconds.
    ///
    /// Bounds a whole request, including connect and body download.
    /// Must be greater than 0.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Value for the `Authorization` header of suite requests.
    ///
    /// A bare token is sent as `Bearer <token>`; an empty string sends no
    /// header at all.
    #[serde(default = "default_auth_token")]
    pub auth_token: String,

    /// Whether to follow 3xx responses.
    #[serde(default = "default_follow_redirects")]
    pub follow_redirects: bool,

    /// Maximum number of redirects to follow when `follow_redirects` is set.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: u32,

    /// Whether to validate TLS certificates for https targets.
    #[serde(default = "default_validate_ssl")]
    pub validate_ssl: bool,

    /// Headers added to every request unless the request sets them itself.
    #[serde(default = "default_headers")]
    pub default_headers: HashMap<String, String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            auth_token: default_auth_token(),
            follow_redirects: default_follow_redirects(),
            max_redirects: default_max_redirects(),
            validate_ssl: default_validate_ssl(),
            default_headers: default_headers(),
        }
    }
}

impl ProbeConfig {
    /// Validates the configuration and returns a message naming the first
    /// invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout == 0 {
            return Err("timeout must be greater than 0".to_string());
        }

        match url::Url::parse(&self.base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => {
                return Err(format!(
                    "baseUrl must use http or https, got '{}'",
                    url.scheme()
                ))
            }
            Err(e) => return Err(format!("baseUrl is not a valid URL: {}", e)),
        }

        Ok(())
    }

    /// Returns the request timeout as a `Duration`.
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    /// Joins `path` onto the base URL.
    ///
    /// `path` is taken as relative to the base URL's root, so
    /// `"/api/users"` and `"api/users"` resolve alike.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, path)
        }
    }
}

// Default value functions for serde

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout() -> u64 {
    10000
}

fn default_auth_token() -> String {
    "Bearer valid_token".to_string()
}

fn default_follow_redirects() -> bool {
    true
}

fn default_max_redirects() -> u32 {
    10
}

fn default_validate_ssl() -> bool {
    true
}

fn default_headers() -> HashMap<String, String> {
    let mut headers = HashMap::new();
    headers.insert(
        "User-Agent".to_string(),
        format!("http-probe/{}", env!("CARGO_PKG_VERSION")),
    );
    headers
}
