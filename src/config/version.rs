//! Graph API version definitions.
//!
//! This module provides the [`GraphVersion`] enum for selecting which version
//! of the Graph API requests are sent to.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Graph API version.
///
/// The version is the first path segment of every Graph URL, e.g.
/// `https://graph.facebook.com/v2.9/{id}`.
///
/// # Example
///
/// ```rust
/// use commerce_graph::GraphVersion;
///
/// let version: GraphVersion = "v2.9".parse().unwrap();
/// assert_eq!(version, GraphVersion::V2_9);
/// assert_eq!(version.to_string(), "v2.9");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GraphVersion {
    /// Graph API v2.9
    V2_9,
    /// Graph API v2.10
    V2_10,
    /// Graph API v2.11
    V2_11,
    /// Graph API v2.12
    V2_12,
    /// Any other well-formed `vMAJOR.MINOR` version.
    Custom(String),
}

impl GraphVersion {
    /// Returns the version the catalog endpoints were written against.
    #[must_use]
    pub const fn default_version() -> Self {
        Self::V2_9
    }

    /// Returns `true` for the named variants.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }

    fn is_well_formed(s: &str) -> bool {
        let Some(rest) = s.strip_prefix('v') else {
            return false;
        };
        let mut parts = rest.splitn(2, '.');
        let (Some(major), Some(minor)) = (parts.next(), parts.next()) else {
            return false;
        };
        [major, minor]
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
    }
}

impl Default for GraphVersion {
    fn default() -> Self {
        Self::default_version()
    }
}

impl fmt::Display for GraphVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V2_9 => f.write_str("v2.9"),
            Self::V2_10 => f.write_str("v2.10"),
            Self::V2_11 => f.write_str("v2.11"),
            Self::V2_12 => f.write_str("v2.12"),
            Self::Custom(version) => f.write_str(version),
        }
    }
}

impl FromStr for GraphVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "v2.9" => Ok(Self::V2_9),
            "v2.10" => Ok(Self::V2_10),
            "v2.11" => Ok(Self::V2_11),
            "v2.12" => Ok(Self::V2_12),
            _ if Self::is_well_formed(s) => Ok(Self::Custom(s.to_string())),
            _ => Err(ConfigError::InvalidApiVersion {
                version: s.to_string(),
            }),
        }
    }
}
