//! # GraphQL Upload Client
//!
//! An async client for GraphQL over HTTP, with support for the
//! [GraphQL multipart request specification](https://github.com/jaydenseric/graphql-multipart-request-spec)
//! for file uploads.
//!
//! ## Overview
//!
//! This crate provides:
//! - Plain query and mutation execution via [`GraphqlClient::execute`]
//! - Single and multiple file uploads via [`GraphqlClient::single_upload`]
//!   and [`GraphqlClient::multi_upload`]
//! - Typed extraction of reply data via [`Response::guess`]
//! - Per-call cancellation and deadlines via [`CallContext`]
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//!
//! ## Quick Start
//!
//! ```rust
//! use graphql_upload_client::{ClientConfig, Endpoint, GraphqlClient};
//!
//! let config = ClientConfig::builder()
//!     .endpoint(Endpoint::new("https://api.example.com/graphql").unwrap())
//!     .header("Authorization", "Bearer token")
//!     .build()
//!     .unwrap();
//!
//! let client = GraphqlClient::new(config).unwrap();
//! ```
//!
//! ## Making Requests
//!
//! ```rust,ignore
//! use graphql_upload_client::{CallContext, GraphqlClient, GraphqlError, Upload};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct File {
//!     #[serde(rename = "filename")]
//!     file_name: String,
//!     #[serde(rename = "mimetype")]
//!     mime_type: String,
//! }
//!
//! let ctx = CallContext::new();
//! let upload = Upload::from_path("report.pdf").await?;
//! let response = client
//!     .single_upload(
//!         &ctx,
//!         "mutation ($file: Upload!) { singleUpload(file: $file) { filename mimetype } }",
//!         "",
//!         upload,
//!     )
//!     .await?;
//!
//! let file: File = response.guess("singleUpload")?;
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Clients hold their endpoint and transport explicitly
//! - **Fail-fast validation**: Configuration newtypes validate on construction
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Async-first**: Designed for use with Tokio async runtime
//! - **No hidden retries**: Every failure is returned to the caller

pub mod clients;
pub mod config;
pub mod error;

// Re-export public types at crate root for convenience
pub use config::{ClientConfig, ClientConfigBuilder, Endpoint};
pub use error::ConfigError;

// Re-export client types
pub use clients::{
    BuildError, CallContext, CancelReason, GraphqlClient, GraphqlError, GraphqlResponseError,
    GuessError, HttpResponseError, Operation, PathSegment, Response, SourceLocation, Upload,
    UploadMode, UploadPayload,
};
