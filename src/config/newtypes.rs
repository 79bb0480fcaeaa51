//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated Graph API access token.
///
/// The token is sent as `Authorization: Bearer <token>` on every request
/// (or as the `access_token` query parameter for feed uploads), so it can
/// never be empty.
///
/// # Security
///
/// The `Debug` implementation masks the value, displaying only
/// `AccessToken(*****)`.
///
/// # Example
///
/// ```rust
/// use commerce_graph::AccessToken;
///
/// let token = AccessToken::new("EAAB-token").unwrap();
/// assert_eq!(token.as_ref(), "EAAB-token");
/// assert_eq!(format!("{:?}", token), "AccessToken(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Creates a new validated access token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAccessToken`] if the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::EmptyAccessToken);
        }
        Ok(Self(token))
    }

    /// Returns the value of the `Authorization` header for this token.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(*****)")
    }
}

/// An identifier naming a remote Graph entity.
///
/// Catalogs, product groups, product items, feeds, uploads and pages are
/// all addressed by an id. Ids are either strings or integers; the
/// identifier is used verbatim in URLs and is not validated.
///
/// # Example
///
/// ```rust
/// use commerce_graph::ResourceId;
///
/// assert_eq!(ResourceId::from(1234_u64).to_string(), "1234");
/// assert_eq!(ResourceId::from("catalog1").as_ref(), "catalog1");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceId(String);

impl ResourceId {
    /// Creates an identifier from anything that renders as a string.
    #[must_use]
    pub fn new(id: impl fmt::Display) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&String> for ResourceId {
    fn from(id: &String) -> Self {
        Self(id.clone())
    }
}

impl From<u64> for ResourceId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<i64> for ResourceId {
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}

impl From<&ResourceId> for ResourceId {
    fn from(id: &ResourceId) -> Self {
        id.clone()
    }
}

impl Serialize for ResourceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Graph returns ids as strings, but numeric ids show up in stored settings.
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Ok(Self(s)),
            serde_json::Value::Number(n) => Ok(Self(n.to_string())),
            other => Err(de::Error::custom(format!(
                "expected a string or numeric id, got {other}"
            ))),
        }
    }
}

/// A validated Graph API host URL (scheme + host, optional port).
///
/// Defaults to `https://graph.facebook.com`; tests and proxies point it
/// elsewhere. A trailing slash is stripped so URLs join cleanly.
///
/// # Example
///
/// ```rust
/// use commerce_graph::GraphHost;
///
/// let host = GraphHost::new("http://localhost:8080/").unwrap();
/// assert_eq!(host.as_ref(), "http://localhost:8080");
/// assert_eq!(host.scheme(), "http");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphHost {
    url: String,
    scheme_end: usize,
}

impl GraphHost {
    /// The public Graph API host.
    pub const FACEBOOK: &'static str = "https://graph.facebook.com";

    /// Creates a new validated host URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHostUrl`] if the URL has no scheme or no host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();

        let scheme_end = url
            .find("://")
            .ok_or_else(|| ConfigError::InvalidHostUrl { url: url.clone() })?;

        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidHostUrl { url });
        }

        let host = &url[scheme_end + 3..];
        if host.is_empty() || host.starts_with([':', '/', '?', '#']) {
            return Err(ConfigError::InvalidHostUrl { url });
        }

        Ok(Self { url, scheme_end })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }
}

impl Default for GraphHost {
    fn default() -> Self {
        Self {
            url: Self::FACEBOOK.to_string(),
            scheme_end: 5,
        }
    }
}

impl AsRef<str> for GraphHost {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_rejects_empty_string() {
        assert!(matches!(
            AccessToken::new(""),
            Err(ConfigError::EmptyAccessToken)
        ));
        assert!(matches!(
            AccessToken::new("   "),
            Err(ConfigError::EmptyAccessToken)
        ));
    }

    #[test]
    fn test_access_token_masks_value_in_debug() {
        let token = AccessToken::new("super-secret-token").unwrap();
        let debug_output = format!("{token:?}");
        assert_eq!(debug_output, "AccessToken(*****)");
        assert!(!debug_output.contains("super-secret-token"));
    }

    #[test]
    fn test_access_token_bearer_header_value() {
        let token = AccessToken::new("abc").unwrap();
        assert_eq!(token.bearer(), "Bearer abc");
    }

    #[test]
    fn test_resource_id_from_numbers_and_strings() {
        assert_eq!(ResourceId::from(42_u64).as_ref(), "42");
        assert_eq!(ResourceId::from(-7_i64).as_ref(), "-7");
        assert_eq!(ResourceId::from("feed1").as_ref(), "feed1");
        assert_eq!(ResourceId::from(String::from("g1")).as_ref(), "g1");
    }

    #[test]
    fn test_resource_id_deserializes_from_string_or_number() {
        let from_str: ResourceId = serde_json::from_str(r#""1234""#).unwrap();
        let from_num: ResourceId = serde_json::from_str("1234").unwrap();
        assert_eq!(from_str, from_num);
        assert!(serde_json::from_str::<ResourceId>("true").is_err());
    }

    #[test]
    fn test_graph_host_default_is_facebook() {
        let host = GraphHost::default();
        assert_eq!(host.as_ref(), "https://graph.facebook.com");
        assert_eq!(host.scheme(), "https");
        assert_eq!(GraphHost::new(GraphHost::FACEBOOK).unwrap(), host);
    }

    #[test]
    fn test_graph_host_strips_trailing_slash() {
        let host = GraphHost::new("http://127.0.0.1:9000/").unwrap();
        assert_eq!(host.as_ref(), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_graph_host_rejects_invalid() {
        assert!(GraphHost::new("graph.facebook.com").is_err());
        assert!(GraphHost::new("https://").is_err());
        assert!(GraphHost::new("://graph.facebook.com").is_err());
        assert!(GraphHost::new("https://:443").is_err());
    }
}
