//! Client configuration.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_API_ENDPOINT: &str = "https://api.warrant.dev";

const ENV_API_KEY: &str = "WARRANT_API_KEY";
const ENV_API_ENDPOINT: &str = "WARRANT_API_ENDPOINT";
const ENV_AUTHORIZE_ENDPOINT: &str = "WARRANT_AUTHORIZE_ENDPOINT";

/// Where and how the client reaches the service.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Secret API key sent with every request.
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the central service.
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,

    /// Base URL of an edge authorizer. When set, checks go there first.
    #[serde(default)]
    pub authorize_endpoint: Option<String>,
}

fn default_api_endpoint() -> String {
    DEFAULT_API_ENDPOINT.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_endpoint: default_api_endpoint(),
            authorize_endpoint: None,
        }
    }
}

// Keeps the API key out of logs and panics.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("api_endpoint", &self.api_endpoint)
            .field("authorize_endpoint", &self.authorize_endpoint)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api_endpoint = endpoint.into();
        self
    }

    pub fn with_authorize_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.authorize_endpoint = Some(endpoint.into());
        self
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!("failed to read {}: {e}", path.as_ref().display()))
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self> {
        toml::from_str(toml).map_err(|e| Error::Config(e.to_string()))
    }

    /// Override fields from `WARRANT_*` environment variables.
    pub fn apply_env(self) -> Self {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    fn apply_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = var(ENV_API_KEY) {
            self.api_key = key;
        }
        if let Some(endpoint) = var(ENV_API_ENDPOINT) {
            self.api_endpoint = endpoint;
        }
        if let Some(endpoint) = var(ENV_AUTHORIZE_ENDPOINT) {
            self.authorize_endpoint = Some(endpoint).filter(|e| !e.is_empty());
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(Error::Config(format!(
                "api_key is not set (config file or {ENV_API_KEY})"
            )));
        }
        if self.api_endpoint.is_empty() {
            return Err(Error::Config("api_endpoint is empty".into()));
        }
        if self.authorize_endpoint.as_deref() == Some("") {
            return Err(Error::Config("authorize_endpoint is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn parse_minimal() {
        let config = ClientConfig::parse(r#"api_key = "sk_test""#).unwrap();
        assert_eq!(config.api_key, "sk_test");
        assert_eq!(config.api_endpoint, DEFAULT_API_ENDPOINT);
        assert_eq!(config.authorize_endpoint, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_with_edge() {
        let toml = r#"
api_key = "sk_test"
api_endpoint = "https://central.internal"
authorize_endpoint = "http://localhost:3000"
"#;
        let config = ClientConfig::parse(toml).unwrap();
        assert_eq!(config.api_endpoint, "https://central.internal");
        assert_eq!(config.authorize_endpoint.as_deref(), Some("http://localhost:3000"));
    }

    #[test]
    fn parse_rejects_bad_toml() {
        assert!(matches!(ClientConfig::parse("api_key = "), Err(Error::Config(_))));
    }

    #[test]
    fn env_overrides_file() {
        let vars: HashMap<&str, &str> = [
            (ENV_API_KEY, "sk_env"),
            (ENV_AUTHORIZE_ENDPOINT, "http://edge:3000"),
        ]
        .into();
        let config =
            ClientConfig::new("sk_file").apply_vars(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(config.api_key, "sk_env");
        assert_eq!(config.api_endpoint, DEFAULT_API_ENDPOINT);
        assert_eq!(config.authorize_endpoint.as_deref(), Some("http://edge:3000"));
    }

    #[test]
    fn empty_env_edge_disables_edge() {
        let config = ClientConfig::new("sk")
            .with_authorize_endpoint("http://edge:3000")
            .apply_vars(|name| (name == ENV_AUTHORIZE_ENDPOINT).then(String::new));
        assert_eq!(config.authorize_endpoint, None);
    }

    #[test]
    fn validate_requires_key() {
        assert!(matches!(ClientConfig::default().validate(), Err(Error::Config(_))));
    }

    #[test]
    fn debug_redacts_key() {
        let rendered = format!("{:?}", ClientConfig::new("sk_secret"));
        assert!(!rendered.contains("sk_secret"));
    }
}
