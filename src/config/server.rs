//! Issue service connection settings.

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};
use crate::api::DEFAULT_TIMEOUT_SECS;

/// Default service URL.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// Where the issue service lives and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerSettings {
    /// The service base URL (e.g., "http://localhost:8000").
    pub url: String,

    /// Transport timeout for a single request, in seconds.
    pub timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVER_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ServerSettings {
    /// Create server settings for a URL with the default timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Validate these settings.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` if the URL is empty or has no
    /// http(s) scheme, or if the timeout is zero.
    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(ConfigError::ValidationError(
                "server URL cannot be empty".to_string(),
            ));
        }

        if !self.url.starts_with("https://") && !self.url.starts_with("http://") {
            return Err(ConfigError::ValidationError(format!(
                "server URL '{}' must start with http:// or https://",
                self.url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "server timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_server() {
        let server = ServerSettings::default();
        assert_eq!(server.url, "http://localhost:8000");
        assert_eq!(server.timeout_secs, 30);
        assert!(server.validate().is_ok());
    }

    #[test]
    fn test_empty_url_rejected() {
        let result = ServerSettings::new("").validate();
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("URL cannot be empty"));
    }

    #[test]
    fn test_invalid_url_scheme_rejected() {
        let result = ServerSettings::new("issues.example.com").validate();
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("must start with http"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let server = ServerSettings {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(server.validate().is_err());
    }

    #[test]
    fn test_server_serialization() {
        let server = ServerSettings::new("https://issues.example.com");
        let toml_str = toml::to_string(&server).unwrap();
        let parsed: ServerSettings = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, server);
    }

    #[test]
    fn test_partial_table_uses_defaults() {
        let parsed: ServerSettings = toml::from_str(r#"url = "http://10.0.0.5:9000""#).unwrap();
        assert_eq!(parsed.url, "http://10.0.0.5:9000");
        assert_eq!(parsed.timeout_secs, 30);
    }
}
