//! Configuration types for the GraphQL client.
//!
//! This module provides the configuration used to construct a
//! [`GraphqlClient`](crate::GraphqlClient).
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ClientConfig`]: The configuration struct holding all client settings
//! - [`ClientConfigBuilder`]: A builder for constructing [`ClientConfig`] instances
//! - [`Endpoint`]: A validated GraphQL endpoint URL
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use graphql_upload_client::{ClientConfig, Endpoint};
//!
//! let config = ClientConfig::builder()
//!     .endpoint(Endpoint::new("https://api.example.com/graphql").unwrap())
//!     .header("Authorization", "Bearer token")
//!     .timeout(Duration::from_secs(30))
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;

pub use newtypes::Endpoint;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::ConfigError;

/// Crate version from Cargo.toml.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration for a [`GraphqlClient`](crate::GraphqlClient).
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
///
/// # Example
///
/// ```rust
/// use graphql_upload_client::{ClientConfig, Endpoint};
///
/// let config = ClientConfig::builder()
///     .endpoint(Endpoint::new("http://localhost:4000/").unwrap())
///     .user_agent_prefix("MyApp/1.0")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.user_agent_prefix(), Some("MyApp/1.0"));
/// ```
#[derive(Clone, Debug)]
pub struct ClientConfig {
    endpoint: Endpoint,
    user_agent_prefix: Option<String>,
    default_headers: HeaderMap,
    timeout: Option<Duration>,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the endpoint requests are posted to.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the headers sent with every request.
    ///
    /// Always contains `User-Agent` and `Accept`, plus anything added via
    /// [`ClientConfigBuilder::header`].
    #[must_use]
    pub const fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    /// Returns the overall request timeout applied to the default transport.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl From<Endpoint> for ClientConfig {
    fn from(endpoint: Endpoint) -> Self {
        Self {
            default_headers: base_headers(None),
            endpoint,
            user_agent_prefix: None,
            timeout: None,
        }
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

fn base_headers(user_agent_prefix: Option<&str>) -> HeaderMap {
    let prefix = user_agent_prefix.map_or(String::new(), |prefix| format!("{prefix} | "));
    let rust_version = env!("CARGO_PKG_RUST_VERSION");
    let user_agent =
        format!("{prefix}graphql-upload-client v{CLIENT_VERSION} | Rust {rust_version}");

    let mut headers = HeaderMap::new();
    // A prefix that is not a valid header value falls back to the bare agent string.
    let user_agent = HeaderValue::from_str(&user_agent).unwrap_or_else(|_| {
        HeaderValue::from_static(concat!("graphql-upload-client v", env!("CARGO_PKG_VERSION")))
    });
    headers.insert(reqwest::header::USER_AGENT, user_agent);
    headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_static("application/json"),
    );
    headers
}

/// Builder for constructing [`ClientConfig`] instances.
///
/// The only required field is `endpoint`.
///
/// # Defaults
///
/// - `user_agent_prefix`: `None`
/// - extra headers: none
/// - `timeout`: `None` (no overall timeout; use a
///   [`CallContext`](crate::CallContext) deadline per call instead)
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    endpoint: Option<Endpoint>,
    user_agent_prefix: Option<String>,
    headers: Vec<(String, String)>,
    timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the endpoint (required).
    #[must_use]
    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Adds a header sent with every request.
    ///
    /// Later values for the same name replace earlier ones. Names and values
    /// are validated in [`build`](Self::build).
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the overall request timeout of the default transport.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `endpoint` is not set,
    /// or [`ConfigError::InvalidHeader`] if a header name or value is not
    /// valid on the wire.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let endpoint = self
            .endpoint
            .ok_or(ConfigError::MissingRequiredField { field: "endpoint" })?;

        let mut default_headers = base_headers(self.user_agent_prefix.as_deref());
        for (name, value) in self.headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| ConfigError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            let header_value =
                HeaderValue::from_str(&value).map_err(|e| ConfigError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            default_headers.insert(header_name, header_value);
        }

        Ok(ClientConfig {
            endpoint,
            user_agent_prefix: self.user_agent_prefix,
            default_headers,
            timeout: self.timeout,
        })
    }
}
