//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use reqwest::Url;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated GraphQL endpoint URL.
///
/// The URL must parse, use the `http` or `https` scheme, and name a host.
/// The text is kept as given (after trimming) for display and serialization.
///
/// # Serialization
///
/// `Endpoint` serializes to and deserializes from the URL string:
///
/// ```rust
/// use graphql_upload_client::Endpoint;
///
/// let endpoint = Endpoint::new("https://api.example.com/graphql").unwrap();
/// let json = serde_json::to_string(&endpoint).unwrap();
/// assert_eq!(json, r#""https://api.example.com/graphql""#);
/// ```
///
/// # Example
///
/// ```rust
/// use graphql_upload_client::Endpoint;
///
/// let endpoint = Endpoint::new("http://localhost:4000/").unwrap();
/// assert_eq!(endpoint.scheme(), "http");
/// assert_eq!(endpoint.host_name(), "localhost");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    url: String,
    parsed: Url,
}

impl Endpoint {
    /// Creates a new validated endpoint.
    ///
    /// Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyEndpoint`] if the URL is empty, or
    /// [`ConfigError::InvalidEndpoint`] if it does not parse, the scheme is
    /// not `http`/`https`, or the host is missing.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url: String = url.into();
        let url = url.trim().to_string();
        if url.is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }

        let invalid = || ConfigError::InvalidEndpoint { url: url.clone() };

        // The URL parser skips extra slashes after a special scheme, which
        // would turn the first path segment of `https:///graphql` into a host.
        let authority = url.split_once("://").ok_or_else(invalid)?.1;
        if authority.is_empty() || authority.starts_with('/') {
            return Err(invalid());
        }

        let parsed = Url::parse(&url).map_err(|_| invalid())?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid());
        }
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(invalid());
        }

        Ok(Self { url, parsed })
    }

    /// Returns the URL scheme (`http` or `https`), lowercased.
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.parsed.scheme()
    }

    /// Returns the host name portion of the URL.
    ///
    /// IPv6 literals keep their brackets, e.g. `[::1]`.
    #[must_use]
    pub fn host_name(&self) -> &str {
        self.parsed.host_str().unwrap_or_default()
    }

    /// Returns the parsed URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.parsed
    }
}

impl AsRef<str> for Endpoint {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl std::str::FromStr for Endpoint {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for Endpoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.url)
    }
}

impl<'de> Deserialize<'de> for Endpoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}
