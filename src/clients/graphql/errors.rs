//! GraphQL client error types.
//!
//! Every failure of a call is returned as a [`GraphqlError`] whose message
//! starts with the stage it happened in:
//!
//! - `build request error:` the operation could not be encoded ([`BuildError`])
//! - `graphql do error:` the exchange failed, was cancelled, or the reply
//!   could not be decoded
//! - `{operation} error:` the reply decoded but carries GraphQL errors
//! - `guess error:` typed extraction failed ([`GuessError`])
//!
//! Nothing is retried; retry policy belongs to the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use graphql_upload_client::{GraphqlClient, GraphqlError, CallContext};
//!
//! match client.execute(&CallContext::new(), "query { me { id } }", "me", Default::default()).await {
//!     Ok(response) => println!("data: {:?}", response.data),
//!     Err(GraphqlError::Response(response)) => {
//!         for error in &response.errors {
//!             println!("GraphQL error: {}", error.message);
//!         }
//!     }
//!     Err(GraphqlError::Cancelled(reason)) => println!("gave up: {reason}"),
//!     Err(other) => println!("failed: {other}"),
//! }
//! ```

use thiserror::Error;

use crate::clients::context::CancelReason;
use crate::clients::errors::HttpResponseError;
use crate::clients::graphql::response::Response;

/// The operation could not be turned into a request body.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Variables or a JSON part could not be serialized.
    #[error("serialize operation: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Variables must serialize to a JSON object.
    #[error("variables must be a JSON object")]
    VariablesNotObject,

    /// Multipart encoding was requested for an operation without uploads.
    #[error("has no files")]
    NoUploads,

    /// Single-upload mode was requested for several uploads.
    #[error("single upload expects exactly one file, got {count}")]
    TooManyUploads {
        /// Number of uploads on the operation.
        count: usize,
    },

    /// An upload's mime type is not a valid content type.
    #[error("invalid mime type '{mime_type}': {source}")]
    InvalidMimeType {
        /// The rejected mime type.
        mime_type: String,
        /// The underlying parse error.
        #[source]
        source: reqwest::Error,
    },
}

/// Typed extraction from a reply failed.
///
/// The destination is never written when this is returned.
#[derive(Debug, Error)]
pub enum GuessError {
    /// The reply's `data` is absent or `null`.
    #[error("has no data")]
    NoData,

    /// The reply carries GraphQL errors; holds the whole reply.
    #[error("{0}")]
    Protocol(Box<Response>),

    /// `data` has no member with the requested name.
    #[error("has no data about {name}")]
    MissingField {
        /// The requested field.
        name: String,
    },

    /// The field's value does not fit the destination type.
    #[error("convert {name}: {source}")]
    Conversion {
        /// The requested field.
        name: String,
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}

/// Error type for GraphQL client calls.
#[derive(Debug, Error)]
pub enum GraphqlError {
    /// The request could not be built.
    #[error("build request error: {0}")]
    Build(#[from] BuildError),

    /// The HTTP exchange failed.
    #[error("graphql do error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The call context was cancelled or its deadline passed.
    ///
    /// Reported instead of [`Transport`](Self::Transport) when both happen.
    #[error("graphql do error: {0}")]
    Cancelled(CancelReason),

    /// A non-2xx reply whose body is not a GraphQL reply.
    #[error("graphql do error: {0}")]
    Status(#[from] HttpResponseError),

    /// The reply body is not a well-formed GraphQL reply.
    #[error("graphql do error: {0}")]
    Decode(#[source] serde_json::Error),

    /// The reply decoded but carries GraphQL errors.
    #[error(transparent)]
    Response(Box<Response>),

    /// Typed extraction failed.
    #[error("guess error: {0}")]
    Guess(#[from] GuessError),
}

impl GraphqlError {
    /// Returns the cancellation reason if the call was cancelled.
    #[must_use]
    pub const fn cancel_reason(&self) -> Option<CancelReason> {
        match self {
            Self::Cancelled(reason) => Some(*reason),
            _ => None,
        }
    }

    /// Returns the reply if the call failed with GraphQL errors.
    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Response(response) => Some(&**response),
            _ => None,
        }
    }
}

impl From<Response> for GraphqlError {
    fn from(response: Response) -> Self {
        Self::Response(Box::new(response))
    }
}
