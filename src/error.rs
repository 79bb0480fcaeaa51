//! Error types for client configuration.
//!
//! This module contains the error type returned when building configuration
//! values such as access tokens, hosts and API versions.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Errors raised while talking to the Graph API live in
//! [`crate::clients::GraphError`] instead.
//!
//! # Example
//!
//! ```rust
//! use commerce_graph::{AccessToken, ConfigError};
//!
//! let result = AccessToken::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyAccessToken)));
//! ```

use thiserror::Error;

/// Errors that can occur while configuring the client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Access token cannot be empty.
    #[error("Access token cannot be empty. Please provide a valid Graph API access token.")]
    EmptyAccessToken,

    /// Graph API version is invalid.
    #[error("Invalid Graph API version '{version}'. Expected format: 'vMAJOR.MINOR' (e.g., 'v2.9').")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// Graph host URL is invalid.
    #[error("Invalid host URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://graph.facebook.com').")]
    InvalidHostUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// Request timeout must be positive.
    #[error("Request timeout must be greater than zero.")]
    ZeroTimeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_access_token_error_message() {
        let message = ConfigError::EmptyAccessToken.to_string();
        assert!(message.contains("Access token cannot be empty"));
    }

    #[test]
    fn test_invalid_api_version_error_message() {
        let error = ConfigError::InvalidApiVersion {
            version: "2.9".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("'2.9'"));
        assert!(message.contains("vMAJOR.MINOR"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::ZeroTimeout;
        let _: &dyn std::error::Error = &error;
    }
}
