//! Decoded GraphQL replies and typed extraction.
//!
//! A [`Response`] is the reply envelope `{"data": ..., "errors": [...]}`.
//! It is erroneous iff `errors` is non-empty, whether or not `data` is also
//! present, so partial results stay representable.
//!
//! # Typed extraction
//!
//! [`Response::guess`] pulls one named member out of `data` and decodes it
//! through serde. JSON keys are matched to struct fields by their serde
//! names, so declare the mapping explicitly with `#[serde(rename = "...")]`
//! or `#[serde(rename_all = "...")]`:
//!
//! ```rust
//! use graphql_upload_client::Response;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize, PartialEq)]
//! struct Person {
//!     #[serde(rename = "name")]
//!     full_name: String,
//!     age: u32,
//! }
//!
//! let response = Response::from_slice(
//!     br#"{"data": {"person": {"name": "Jack", "age": 26}}}"#,
//!     "person",
//! )
//! .unwrap();
//!
//! let person: Person = response.guess("person").unwrap();
//! assert_eq!(person, Person { full_name: "Jack".to_string(), age: 26 });
//! ```

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::clients::graphql::errors::GuessError;

/// A position in the query text, 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceLocation {
    /// Line number.
    pub line: u32,
    /// Column number.
    pub column: u32,
}

/// One segment of an error path: a field name or a list index.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// A field name or alias.
    Key(String),
    /// An index into a list.
    Index(u64),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// An error reported by the server while parsing, validating, or executing
/// an operation.
///
/// Besides the message it may locate the problem in the query text
/// (`locations`) and in the result (`path`).
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GraphqlResponseError {
    /// Human-readable description.
    pub message: String,
    /// Path of the offending field in the result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathSegment>>,
    /// Locations in the query text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<SourceLocation>>,
    /// Server-specific details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Map<String, Value>>,
}

/// A decoded GraphQL reply.
///
/// Displays as `"{operation_name} error: {errors as pretty JSON}"`, which is
/// how it reads when returned as [`GraphqlError::Response`](crate::GraphqlError::Response).
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Response {
    /// Result data; `None` when absent or `null`.
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
    /// Errors; empty when absent or `null`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<GraphqlResponseError>,
    /// Top-level `extensions` member (cost, tracing, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Map<String, Value>>,
    /// Name of the operation this reply answers. Not part of the wire format.
    #[serde(skip)]
    pub operation_name: String,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Response {
    /// Decodes a reply body, associating it with `operation_name`.
    ///
    /// This is a structural decode only; a reply with GraphQL errors decodes
    /// successfully.
    ///
    /// # Errors
    ///
    /// Returns the decode error if `body` is not JSON or its members have
    /// the wrong types.
    pub fn from_slice(body: &[u8], operation_name: impl Into<String>) -> serde_json::Result<Self> {
        let mut response: Self = serde_json::from_slice(body)?;
        response.operation_name = operation_name.into();
        Ok(response)
    }

    /// Returns true iff the reply carries at least one error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns true if the reply carries `data` or at least one error.
    ///
    /// Every member of the envelope is optional, so any JSON object decodes;
    /// this tells a GraphQL reply apart from, say, a proxy's error document.
    #[must_use]
    pub fn is_graphql_reply(&self) -> bool {
        self.data.is_some() || self.has_errors()
    }

    /// Returns the raw value of a `data` member.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.as_ref()?.get(name)
    }

    /// Extracts `data[name]` as a `T`.
    ///
    /// Checks run in this order:
    ///
    /// 1. `data` absent or `null` → [`GuessError::NoData`], even when errors
    ///    are present
    /// 2. errors present → [`GuessError::Protocol`], even when `data[name]`
    ///    exists; read partial data with [`field`](Self::field)
    /// 3. `name` missing → [`GuessError::MissingField`]
    /// 4. value does not decode as `T` → [`GuessError::Conversion`]
    ///
    /// A JSON object decodes into a record, a JSON list into `Vec<T>` (or
    /// `Vec<Box<T>>`) in the same order.
    ///
    /// # Errors
    ///
    /// See the list above.
    pub fn guess<T: DeserializeOwned>(&self, name: &str) -> Result<T, GuessError> {
        let data = self.data.as_ref().ok_or(GuessError::NoData)?;
        if self.has_errors() {
            return Err(GuessError::Protocol(Box::new(self.clone())));
        }
        let value = data.get(name).ok_or_else(|| GuessError::MissingField {
            name: name.to_string(),
        })?;
        T::deserialize(value).map_err(|source| GuessError::Conversion {
            name: name.to_string(),
            source,
        })
    }

    /// Like [`guess`](Self::guess), writing into `destination`.
    ///
    /// `destination` is left untouched on error.
    ///
    /// # Errors
    ///
    /// Same as [`guess`](Self::guess).
    pub fn guess_into<T: DeserializeOwned>(
        &self,
        name: &str,
        destination: &mut T,
    ) -> Result<(), GuessError> {
        *destination = self.guess(name)?;
        Ok(())
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = serde_json::to_string_pretty(&self.errors).map_err(|_| fmt::Error)?;
        write!(f, "{} error: {errors}", self.operation_name)
    }
}

impl std::error::Error for Response {}
