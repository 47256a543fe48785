//! HTTP-level error types.
//!
//! A GraphQL server normally answers with status 200 and reports failures in
//! the reply's `errors` member, and many servers also attach a well-formed
//! reply to 4xx/5xx statuses. [`HttpResponseError`] is only produced when a
//! non-2xx reply carries a body that is *not* a GraphQL reply, such as an HTML
//! error page from a proxy.

use thiserror::Error;

/// Error returned when a non-successful HTTP reply has no GraphQL body.
///
/// # Example
///
/// ```rust
/// use graphql_upload_client::HttpResponseError;
///
/// let error = HttpResponseError {
///     code: 502,
///     message: "<html>Bad Gateway</html>".to_string(),
///     error_reference: Some("abc-123".to_string()),
/// };
///
/// assert!(error.to_string().contains("502"));
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("HTTP status {code}: {message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The raw response body, lossily decoded as UTF-8.
    pub message: String,
    /// Reference ID for error reporting (from the `X-Request-Id` header).
    pub error_reference: Option<String>,
}
