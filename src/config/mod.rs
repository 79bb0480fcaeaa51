//! Configuration types for the Graph API client.
//!
//! # Overview
//!
//! - [`GraphConfig`]: host, API version, timeout and user agent settings
//! - [`GraphConfigBuilder`]: a builder for constructing [`GraphConfig`] instances
//! - [`AccessToken`]: a validated bearer token with masked debug output
//! - [`ResourceId`]: an identifier naming a remote Graph entity
//! - [`GraphHost`]: a validated Graph host URL
//! - [`GraphVersion`]: the Graph API version to use
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use commerce_graph::{GraphConfig, GraphVersion};
//!
//! let config = GraphConfig::builder()
//!     .api_version(GraphVersion::V2_9)
//!     .timeout(Duration::from_secs(30))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.api_base(), "https://graph.facebook.com/v2.9/");
//! ```

mod newtypes;
mod version;

pub use newtypes::{AccessToken, GraphHost, ResourceId};
pub use version::GraphVersion;

use std::time::Duration;

use crate::error::ConfigError;

/// Timeout applied to every request, synchronous or deferred.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(500);

/// Configuration for the Graph API client.
///
/// `GraphConfig` is `Clone`, `Send`, and `Sync`. It holds no credentials;
/// the access token is handed to [`crate::GraphClient`] separately.
#[derive(Clone, Debug)]
pub struct GraphConfig {
    host: GraphHost,
    api_version: GraphVersion,
    timeout: Duration,
    user_agent_prefix: Option<String>,
}

impl GraphConfig {
    /// Creates a new builder for constructing a `GraphConfig`.
    #[must_use]
    pub fn builder() -> GraphConfigBuilder {
        GraphConfigBuilder::new()
    }

    /// Returns the Graph host.
    #[must_use]
    pub const fn host(&self) -> &GraphHost {
        &self.host
    }

    /// Returns the API version.
    #[must_use]
    pub const fn api_version(&self) -> &GraphVersion {
        &self.api_version
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the fixed base every resource URL starts with,
    /// e.g. `https://graph.facebook.com/v2.9/`.
    #[must_use]
    pub fn api_base(&self) -> String {
        format!("{}/{}/", self.host.as_ref(), self.api_version)
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            host: GraphHost::default(),
            api_version: GraphVersion::default(),
            timeout: DEFAULT_TIMEOUT,
            user_agent_prefix: None,
        }
    }
}

// Verify GraphConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphConfig>();
};

/// Builder for constructing [`GraphConfig`] instances.
///
/// # Defaults
///
/// - `host`: `https://graph.facebook.com`
/// - `api_version`: `v2.9`
/// - `timeout`: [`DEFAULT_TIMEOUT`]
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct GraphConfigBuilder {
    host: Option<GraphHost>,
    api_version: Option<GraphVersion>,
    timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
}

impl GraphConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Graph host.
    #[must_use]
    pub fn host(mut self, host: GraphHost) -> Self {
        self.host = Some(host);
        self
    }

    /// Sets the API version.
    #[must_use]
    pub fn api_version(mut self, version: GraphVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Sets the timeout applied to every request.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`GraphConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTimeout`] if a zero timeout was set.
    pub fn build(self) -> Result<GraphConfig, ConfigError> {
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(GraphConfig {
            host: self.host.unwrap_or_default(),
            api_version: self.api_version.unwrap_or_default(),
            timeout,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = GraphConfig::builder().build().unwrap();

        assert_eq!(config.host().as_ref(), "https://graph.facebook.com");
        assert_eq!(config.api_version(), &GraphVersion::V2_9);
        assert_eq!(config.timeout(), Duration::from_secs(500));
        assert!(config.user_agent_prefix().is_none());
    }

    #[test]
    fn test_default_matches_builder_defaults() {
        let config = GraphConfig::default();
        assert_eq!(config.api_base(), "https://graph.facebook.com/v2.9/");
    }

    #[test]
    fn test_api_base_uses_host_and_version() {
        let config = GraphConfig::builder()
            .host(GraphHost::new("http://127.0.0.1:4000").unwrap())
            .api_version(GraphVersion::V2_12)
            .build()
            .unwrap();

        assert_eq!(config.api_base(), "http://127.0.0.1:4000/v2.12/");
    }

    #[test]
    fn test_builder_rejects_zero_timeout() {
        let result = GraphConfig::builder().timeout(Duration::ZERO).build();
        assert!(matches!(result, Err(ConfigError::ZeroTimeout)));
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let config = GraphConfig::builder()
            .timeout(Duration::from_secs(5))
            .user_agent_prefix("CatalogSync/1.0")
            .build()
            .unwrap();

        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.user_agent_prefix(), Some("CatalogSync/1.0"));
    }
}
