//! Configuration loading from warrant.toml.

use client::ClientConfig;
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Log filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Service endpoints and credentials.
    #[serde(default)]
    pub client: ClientConfig,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            client: ClientConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full() {
        let toml = r#"
log_level = "client=debug"

[client]
api_key = "sk_test"
authorize_endpoint = "http://localhost:3000"
"#;
        let config = Config::parse(toml).unwrap();
        assert_eq!(config.log_level, "client=debug");
        assert_eq!(config.client.api_key, "sk_test");
        assert_eq!(config.client.api_endpoint, client::DEFAULT_API_ENDPOINT);
        assert_eq!(
            config.client.authorize_endpoint.as_deref(),
            Some("http://localhost:3000")
        );
    }

    #[test]
    fn parse_empty_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.log_level, "warn");
        assert!(config.client.api_key.is_empty());
    }

    #[test]
    fn parse_error() {
        assert!(matches!(Config::parse("[client"), Err(ConfigError::Parse(_))));
    }
}
