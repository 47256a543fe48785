//! Error types for client configuration.
//!
//! This module contains the error type returned while building a
//! [`ClientConfig`](crate::ClientConfig) and its validated newtypes.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use graphql_upload_client::{ConfigError, Endpoint};
//!
//! let result = Endpoint::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyEndpoint)));
//! ```

use thiserror::Error;

/// Errors that can occur during client configuration.
///
/// This enum represents all possible errors that can occur when creating
/// or validating configuration types. Each variant provides a clear,
/// actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Endpoint URL cannot be empty.
    #[error("Endpoint URL cannot be empty. Please provide the URL of a GraphQL server.")]
    EmptyEndpoint,

    /// Endpoint URL is invalid.
    #[error("Invalid endpoint URL '{url}'. Expected an http or https URL (e.g., 'https://api.example.com/graphql').")]
    InvalidEndpoint {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// A default header could not be represented on the wire.
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader {
        /// The header name that was provided.
        name: String,
        /// Why the header was rejected.
        reason: String,
    },

    /// The default HTTP transport could not be created.
    #[error("Failed to create HTTP client: {reason}")]
    HttpClient {
        /// The underlying transport error.
        reason: String,
    },
}
