//! GraphQL operations over HTTP, with multipart file uploads.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`GraphqlClient`]: Sends operations to one endpoint
//! - [`Operation`]: Query text, operation name, variables and uploads
//! - [`Upload`]: A named file attachment
//! - [`Response`]: The decoded reply, with typed extraction via [`Response::guess`]
//! - [`GraphqlError`]: Error type for client calls
//!
//! # Wire Format
//!
//! Plain operations are posted as `application/json`:
//!
//! ```json
//! {"operationName": "hero", "query": "query hero { ... }", "variables": {}}
//! ```
//!
//! Upload operations are posted as `multipart/form-data` following the
//! [GraphQL multipart request specification](https://github.com/jaydenseric/graphql-multipart-request-spec):
//! an `operations` part, a `map` part, and one file part per upload named
//! `"0"`, `"1"`, ….
//!
//! # Example
//!
//! ```rust,ignore
//! use graphql_upload_client::{CallContext, Endpoint, GraphqlClient, Upload};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Human {
//!     #[serde(rename = "id")]
//!     id: String,
//!     #[serde(rename = "name")]
//!     name: String,
//! }
//!
//! let client = GraphqlClient::new(Endpoint::new("http://localhost:8080/query")?)?;
//! let ctx = CallContext::new().with_timeout(std::time::Duration::from_secs(10));
//!
//! let variables = serde_json::json!({ "text": "Luke" });
//! let response = client
//!     .execute(&ctx, SEARCH_QUERY, "search", variables.as_object().cloned().unwrap_or_default())
//!     .await?;
//! let humans: Vec<Human> = response.guess("search")?;
//!
//! let files = vec![Upload::new("a.txt", "a"), Upload::new("b.txt", "b")];
//! client.multi_upload(&ctx, MULTI_UPLOAD_MUTATION, "", files).await?;
//! ```
//!
//! # Errors in Replies
//!
//! `execute`, `single_upload` and `multi_upload` fail with
//! [`GraphqlError::Response`] when the reply carries GraphQL errors, even if
//! it also carries partial data. Use [`GraphqlClient::send`] or
//! [`GraphqlClient::send_upload`] to receive such replies as `Ok`.

mod client;
mod errors;
mod request;
mod response;
mod upload;

pub use client::GraphqlClient;
pub use errors::{BuildError, GraphqlError, GuessError};
pub use request::{
    Operation, UploadMode, UploadPayload, DEFAULT_FILE_CONTENT_TYPE, JSON_CONTENT_TYPE,
};
pub use response::{GraphqlResponseError, PathSegment, Response, SourceLocation};
pub use upload::Upload;
