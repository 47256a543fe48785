//! GraphQL client implementation.
//!
//! This module provides the [`GraphqlClient`] type for executing GraphQL
//! operations, with or without file uploads, against a single endpoint.

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde_json::{Map, Value};

use crate::clients::context::CallContext;
use crate::clients::errors::HttpResponseError;
use crate::clients::graphql::request::{Operation, UploadMode, JSON_CONTENT_TYPE};
use crate::clients::graphql::response::Response;
use crate::clients::graphql::upload::Upload;
use crate::clients::graphql::GraphqlError;
use crate::config::{ClientConfig, Endpoint};
use crate::error::ConfigError;

/// GraphQL client bound to one endpoint.
///
/// Provides `execute` for plain queries and mutations, and `single_upload` /
/// `multi_upload` for the multipart upload convention. These treat a reply
/// carrying GraphQL errors as a failed call; `send` and `send_upload` hand
/// back every decodable reply, errors or not.
///
/// # Thread Safety
///
/// `GraphqlClient` is `Send + Sync` and cheap to clone; clones share the
/// underlying connection pool.
///
/// # Example
///
/// ```rust,ignore
/// use graphql_upload_client::{CallContext, Endpoint, GraphqlClient, Upload};
/// use serde_json::Map;
///
/// let client = GraphqlClient::new(Endpoint::new("http://localhost:4000/")?)?;
/// let ctx = CallContext::new();
///
/// let response = client
///     .execute(&ctx, "query { hero { name } }", "", Map::new())
///     .await?;
/// let name: String = response.guess("hero")?;
///
/// let upload = Upload::new("hello.txt", b"hello".to_vec());
/// let response = client
///     .single_upload(&ctx, "mutation ($file: Upload!) { singleUpload(file: $file) { filename } }", "", upload)
///     .await?;
/// ```
#[derive(Clone, Debug)]
pub struct GraphqlClient {
    /// Endpoint and default headers.
    config: ClientConfig,
    /// The transport; shared, never mutated.
    http_client: reqwest::Client,
}

// Verify GraphqlClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphqlClient>();
};

impl GraphqlClient {
    /// Creates a client with a default transport.
    ///
    /// Accepts an [`Endpoint`] or a full [`ClientConfig`]; the config's
    /// timeout is applied to the transport.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the transport cannot be created
    /// (for example when TLS initialization fails).
    pub fn new(config: impl Into<ClientConfig>) -> Result<Self, ConfigError> {
        let config = config.into();

        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().map_err(|e| ConfigError::HttpClient {
            reason: e.to_string(),
        })?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Creates a client that sends through `http_client`.
    ///
    /// The config's default headers are still added to every request; its
    /// timeout is not, since the transport is already built.
    #[must_use]
    pub fn with_http_client(config: impl Into<ClientConfig>, http_client: reqwest::Client) -> Self {
        Self {
            config: config.into(),
            http_client,
        }
    }

    /// Returns a client for the same endpoint using another transport.
    #[must_use]
    pub fn copy(&self, http_client: reqwest::Client) -> Self {
        tracing::debug!(
            "Copying GraphQL client for {} with a new transport",
            self.config.endpoint()
        );
        Self::with_http_client(self.config.clone(), http_client)
    }

    /// Returns the endpoint requests are posted to.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        self.config.endpoint()
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Executes a query or mutation.
    ///
    /// # Errors
    ///
    /// Returns [`GraphqlError::Response`] if the reply carries GraphQL errors
    /// (the data is not returned even if present), and any other
    /// [`GraphqlError`] variant for build, transport, cancellation, or decode
    /// failures.
    pub async fn execute(
        &self,
        ctx: &CallContext,
        query: &str,
        operation_name: &str,
        variables: Map<String, Value>,
    ) -> Result<Response, GraphqlError> {
        let operation = Operation {
            variables,
            ..Operation::new(query, operation_name)
        };
        self.execute_operation(ctx, &operation).await
    }

    /// Executes a prepared [`Operation`] as JSON, ignoring any uploads.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    pub async fn execute_operation(
        &self,
        ctx: &CallContext,
        operation: &Operation,
    ) -> Result<Response, GraphqlError> {
        reject_errors(self.send(ctx, operation).await?)
    }

    /// Uploads one file, bound to the `$file` variable.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    pub async fn single_upload(
        &self,
        ctx: &CallContext,
        query: &str,
        operation_name: &str,
        upload: Upload,
    ) -> Result<Response, GraphqlError> {
        let operation = Operation::upload(query, operation_name, vec![upload]);
        self.upload(ctx, operation, UploadMode::Single).await
    }

    /// Uploads files, bound in order to the `$files` list variable.
    ///
    /// # Errors
    ///
    /// Returns [`GraphqlError::Build`] if `uploads` is empty, otherwise the
    /// same as [`execute`](Self::execute).
    pub async fn multi_upload(
        &self,
        ctx: &CallContext,
        query: &str,
        operation_name: &str,
        uploads: Vec<Upload>,
    ) -> Result<Response, GraphqlError> {
        let operation = Operation::upload(query, operation_name, uploads);
        self.upload(ctx, operation, UploadMode::Multiple).await
    }

    /// Sends a prepared upload [`Operation`] as a multipart form.
    ///
    /// # Errors
    ///
    /// Same as [`multi_upload`](Self::multi_upload).
    pub async fn upload(
        &self,
        ctx: &CallContext,
        operation: Operation,
        mode: UploadMode,
    ) -> Result<Response, GraphqlError> {
        reject_errors(self.send_upload(ctx, operation, mode).await?)
    }

    /// Sends an operation as JSON and returns the decoded reply as is.
    ///
    /// Unlike [`execute_operation`](Self::execute_operation), a reply with
    /// GraphQL errors is returned as `Ok`, so partial data stays available.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphqlError`] for build, transport, cancellation, status,
    /// or decode failures.
    pub async fn send(
        &self,
        ctx: &CallContext,
        operation: &Operation,
    ) -> Result<Response, GraphqlError> {
        let body = operation.to_json_body()?;
        tracing::debug!(
            "Sending GraphQL operation '{}' to {}",
            operation.name(),
            self.config.endpoint()
        );

        let request = self
            .post()
            .header(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))
            .body(body);
        self.exchange(ctx, operation.name(), request).await
    }

    /// Sends an upload operation as a multipart form and returns the decoded
    /// reply as is.
    ///
    /// # Errors
    ///
    /// Same as [`send`](Self::send); additionally [`GraphqlError::Build`] if
    /// the operation's uploads do not fit `mode`.
    pub async fn send_upload(
        &self,
        ctx: &CallContext,
        operation: Operation,
        mode: UploadMode,
    ) -> Result<Response, GraphqlError> {
        let operation_name = operation.operation_name.clone();
        let file_count = operation.uploads.len();
        let form = operation.into_upload_payload(mode)?.into_form()?;
        tracing::debug!(
            "Sending GraphQL upload '{}' with {} file(s) ({:?}) to {}",
            operation_name,
            file_count,
            mode,
            self.config.endpoint()
        );

        let request = self.post().multipart(form);
        self.exchange(ctx, &operation_name, request).await
    }

    fn post(&self) -> reqwest::RequestBuilder {
        self.http_client
            .post(self.config.endpoint().url().clone())
            .headers(self.config.default_headers().clone())
    }

    /// Performs the exchange and decodes the reply.
    ///
    /// The body is read to completion before decoding. A cancelled context
    /// takes precedence over any transport error.
    async fn exchange(
        &self,
        ctx: &CallContext,
        operation_name: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Response, GraphqlError> {
        if let Some(reason) = ctx.err() {
            return Err(GraphqlError::Cancelled(reason));
        }

        let exchange = async {
            let reply = request.send().await?;
            let status = reply.status();
            let request_id = reply
                .headers()
                .get("x-request-id")
                .and_then(|value| value.to_str().ok())
                .map(String::from);
            let body = reply.bytes().await?;
            Ok::<_, reqwest::Error>((status, request_id, body))
        };

        let (status, request_id, body) = tokio::select! {
            biased;
            reason = ctx.done() => return Err(GraphqlError::Cancelled(reason)),
            result = exchange => match result {
                Ok(reply) => reply,
                Err(error) => return Err(transport_failure(ctx, error)),
            },
        };

        match (status.is_success(), Response::from_slice(&body, operation_name)) {
            (true, Ok(response)) => Ok(response),
            (true, Err(error)) => Err(GraphqlError::Decode(error)),
            // Error statuses are only trusted when the body is a GraphQL reply.
            (false, Ok(response)) if response.is_graphql_reply() => {
                tracing::warn!(
                    "GraphQL operation '{}' answered with HTTP status {}",
                    operation_name,
                    status.as_u16()
                );
                Ok(response)
            }
            (false, _) => Err(HttpResponseError {
                code: status.as_u16(),
                message: String::from_utf8_lossy(&body).into_owned(),
                error_reference: request_id,
            }
            .into()),
        }
    }
}

/// Maps a failed exchange to an error; a done context wins over the
/// transport error it most likely caused.
fn transport_failure(ctx: &CallContext, error: reqwest::Error) -> GraphqlError {
    match ctx.err() {
        Some(reason) => GraphqlError::Cancelled(reason),
        None => GraphqlError::Transport(error),
    }
}

fn reject_errors(response: Response) -> Result<Response, GraphqlError> {
    if response.has_errors() {
        tracing::warn!(
            "GraphQL operation '{}' returned {} error(s)",
            response.operation_name,
            response.errors.len()
        );
        return Err(response.into());
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> Endpoint {
        Endpoint::new("https://api.example.com/graphql").unwrap()
    }

    #[test]
    fn test_client_new_from_endpoint() {
        let client = GraphqlClient::new(endpoint()).unwrap();
        assert_eq!(client.endpoint(), &endpoint());
        assert!(client.config().default_headers().contains_key("User-Agent"));
    }

    #[test]
    fn test_client_new_from_config() {
        let config = ClientConfig::builder()
            .endpoint(endpoint())
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .unwrap();
        let client = GraphqlClient::new(config).unwrap();
        assert_eq!(
            client.config().timeout(),
            Some(std::time::Duration::from_secs(5))
        );
    }

    #[test]
    fn test_copy_keeps_endpoint() {
        let client = GraphqlClient::new(endpoint()).unwrap();
        let copy = client.copy(reqwest::Client::new());
        assert_eq!(copy.endpoint(), client.endpoint());
    }

    #[test]
    fn test_reject_errors_passes_clean_reply() {
        let response = Response::from_slice(br#"{"data": {"a": 1}}"#, "op").unwrap();
        assert!(reject_errors(response).is_ok());
    }

    #[test]
    fn test_reject_errors_fails_partial_reply() {
        let response = Response::from_slice(
            br#"{"data": {"a": 1}, "errors": [{"message": "half"}]}"#,
            "op",
        )
        .unwrap();
        let error = reject_errors(response).unwrap_err();
        assert!(matches!(error, GraphqlError::Response(_)));
    }

    async fn refused_connection() -> reqwest::Error {
        reqwest::Client::new()
            .get("http://127.0.0.1:1/")
            .send()
            .await
            .unwrap_err()
    }

    #[tokio::test]
    async fn test_transport_failure_on_live_context_is_transport_error() {
        let error = transport_failure(&CallContext::new(), refused_connection().await);
        assert!(matches!(error, GraphqlError::Transport(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_after_cancel_reports_cancel() {
        let ctx = CallContext::new();
        ctx.cancel();
        let error = transport_failure(&ctx, refused_connection().await);
        assert!(matches!(
            error,
            GraphqlError::Cancelled(crate::CancelReason::Cancelled)
        ));
    }

    #[tokio::test]
    async fn test_transport_failure_after_deadline_reports_deadline() {
        let ctx = CallContext::new().with_deadline(tokio::time::Instant::now());
        let error = transport_failure(&ctx, refused_connection().await);
        assert_eq!(error.cancel_reason(), Some(crate::CancelReason::DeadlineExceeded));
        assert_eq!(error.to_string(), "graphql do error: context deadline exceeded");
    }

    #[test]
    fn test_graphql_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GraphqlClient>();
    }

    #[tokio::test]
    async fn test_cancelled_context_fails_before_sending() {
        let client = GraphqlClient::new(endpoint()).unwrap();
        let ctx = CallContext::new();
        ctx.cancel();

        let result = client
            .execute(&ctx, "query { a }", "a", Map::new())
            .await;
        assert!(matches!(
            result,
            Err(GraphqlError::Cancelled(crate::CancelReason::Cancelled))
        ));
    }

    #[tokio::test]
    async fn test_multi_upload_without_files_is_build_error() {
        let client = GraphqlClient::new(endpoint()).unwrap();
        let result = client
            .multi_upload(&CallContext::new(), "mutation", "up", Vec::new())
            .await;
        assert!(matches!(result, Err(GraphqlError::Build(_))));
    }
}
