//! Client types for GraphQL communication.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`graphql::GraphqlClient`]: The async GraphQL client
//! - [`CallContext`]: Cancellation and deadline handle passed to every call
//! - [`HttpResponseError`]: A non-2xx reply that is not a GraphQL reply
//!
//! # Cancellation
//!
//! Every call takes a [`CallContext`]. When the context is cancelled or its
//! deadline passes while the exchange is in flight, the call fails with
//! [`GraphqlError::Cancelled`], even if the transport reports its own error
//! at the same moment.
//!
//! # Retry Behavior
//!
//! Nothing is retried. Every failure is returned to the caller.

mod context;
mod errors;
pub mod graphql;

pub use context::{CallContext, CancelReason};
pub use errors::HttpResponseError;

// Re-export GraphQL client types at the clients module level
pub use graphql::{
    BuildError, GraphqlClient, GraphqlError, GraphqlResponseError, GuessError, Operation,
    PathSegment, Response, SourceLocation, Upload, UploadMode, UploadPayload,
};
