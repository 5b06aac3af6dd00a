//! Warrant client — access checks and relationship writes.
//!
//! This crate decides where an access check is evaluated and how the answer
//! is read.
//!
//! # Overview
//!
//! - **Client**: holds the [`ClientConfig`] and a [`Transport`], and exposes
//!   `check`, `check_many`, `has_feature` and `has_permission`.
//! - **Routing**: checks go to the edge authorizer when
//!   `authorize_endpoint` is configured, otherwise to the central service.
//! - **Fallback**: an edge that answers `cache_not_ready` is retried once
//!   against the central service. Other errors are returned unchanged.
//! - **Transport**: [`HttpTransport`] talks HTTP through `reqwest`.
//!
//! # Example
//!
//! ```no_run
//! use client::{Client, ClientConfig};
//! use warrant::{Check, FeatureCheck, ObjectRef, Tenant, User};
//!
//! # async fn example() -> client::Result<()> {
//! let config = ClientConfig::new("sk_live_...").with_authorize_endpoint("http://localhost:3000");
//! let client = Client::new(config)?;
//!
//! let document = ObjectRef::new("document", "doc1");
//! let allowed = client
//!     .check(Check::new(&document, "viewer", &User::new("u1")))
//!     .await?;
//!
//! let has_sso = client
//!     .has_feature(FeatureCheck::new("sso", &Tenant::new("acme")))
//!     .await?;
//! println!("{allowed} {has_sso}");
//! # Ok(())
//! # }
//! ```

mod authorize;
mod config;
mod error;
pub mod transport;
mod warrants;

#[cfg(test)]
mod testing;

pub use authorize::Target;
pub use config::{ClientConfig, DEFAULT_API_ENDPOINT};
pub use error::{CACHE_NOT_READY, Error, Result};
pub use transport::{HttpTransport, Transport};

/// Entry point for checks and warrant writes.
pub struct Client<T = HttpTransport> {
    config: ClientConfig,
    transport: T,
}

impl Client<HttpTransport> {
    /// Create a client that talks HTTP to the configured endpoints.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config);
        Ok(Self { config, transport })
    }
}

impl<T: Transport> Client<T> {
    /// Create a client over a custom transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }
}

impl<T> Client<T> {
    /// Configuration the client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl<T> std::fmt::Display for Client<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let config = self.config();
        write!(f, "warrant({}", config.api_endpoint)?;
        if let Some(edge) = &config.authorize_endpoint {
            write!(f, ", edge={edge}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_requires_api_key() {
        assert!(matches!(Client::new(ClientConfig::default()), Err(Error::Config(_))));
    }

    #[test]
    fn display_shows_endpoints() {
        let client = Client::new(
            ClientConfig::new("sk_test").with_authorize_endpoint("http://localhost:3000"),
        )
        .unwrap();
        assert_eq!(
            client.to_string(),
            "warrant(https://api.warrant.dev, edge=http://localhost:3000)"
        );
        assert!(!client.to_string().contains("sk_test"));
    }
}
