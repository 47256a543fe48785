//! GraphQL operations and their wire encodings.
//!
//! An [`Operation`] is encoded either as a single JSON document (see
//! [`Operation::to_json_body`]) or, when it carries uploads, as a multipart
//! form following the
//! [GraphQL multipart request specification](https://github.com/jaydenseric/graphql-multipart-request-spec)
//! (see [`Operation::upload_payload`]).
//!
//! # Upload placeholders
//!
//! In the multipart encoding the `variables` sent in the `operations` part
//! are replaced by `null` placeholders, and the `map` part tells the server
//! which file part fills which placeholder:
//!
//! | Mode                   | `variables`                  | `map`                                         |
//! |------------------------|------------------------------|-----------------------------------------------|
//! | [`UploadMode::Single`]   | `{"file": null}`             | `{"0": ["variables.file"]}`                   |
//! | [`UploadMode::Multiple`] | `{"files": [null, null]}`    | `{"0": ["variables.files.0"], "1": ["variables.files.1"]}` |
//!
//! The caller's [`Operation`] is never modified; placeholders only exist in
//! the derived [`UploadPayload`].

use std::collections::BTreeMap;

use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::clients::graphql::errors::BuildError;
use crate::clients::graphql::upload::Upload;

/// Content type of plain JSON operations.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content type given to file parts without an explicit mime type.
pub const DEFAULT_FILE_CONTENT_TYPE: &str = "application/octet-stream";

/// A GraphQL query or mutation with its variables and optional uploads.
///
/// Serializes to the JSON request shape
/// `{"operationName": ..., "query": ..., "variables": {...}}`; uploads are
/// never part of the JSON document.
///
/// # Example
///
/// ```rust
/// use graphql_upload_client::Operation;
/// use serde_json::json;
///
/// let operation = Operation::new("query hero { hero { name } }", "hero")
///     .with_variables(&json!({ "episode": "JEDI" }))
///     .unwrap();
///
/// let body: serde_json::Value =
///     serde_json::from_slice(&operation.to_json_body().unwrap()).unwrap();
/// assert_eq!(body["operationName"], "hero");
/// assert_eq!(body["variables"]["episode"], "JEDI");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Operation name; empty for an unnamed operation.
    pub operation_name: String,
    /// The query or mutation text, sent verbatim.
    pub query: String,
    /// Variables by name.
    pub variables: Map<String, Value>,
    /// File attachments, in positional order.
    #[serde(skip)]
    pub uploads: Vec<Upload>,
}

/// How uploads are mapped onto variable placeholders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadMode {
    /// Exactly one upload, bound to `$file`.
    Single,
    /// Any number of uploads, bound to the list `$files`.
    Multiple,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireOperation<'a> {
    operation_name: &'a str,
    query: &'a str,
    variables: &'a Map<String, Value>,
}

impl Operation {
    /// Creates an operation without variables.
    #[must_use]
    pub fn new(query: impl Into<String>, operation_name: impl Into<String>) -> Self {
        Self {
            operation_name: operation_name.into(),
            query: query.into(),
            variables: Map::new(),
            uploads: Vec::new(),
        }
    }

    /// Creates an upload operation.
    ///
    /// Its variables are derived from `uploads` at encoding time.
    #[must_use]
    pub fn upload(
        query: impl Into<String>,
        operation_name: impl Into<String>,
        uploads: Vec<Upload>,
    ) -> Self {
        Self {
            uploads,
            ..Self::new(query, operation_name)
        }
    }

    /// Replaces the variables with the serialized form of `variables`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Serialize`] if serialization fails, or
    /// [`BuildError::VariablesNotObject`] if `variables` does not serialize to
    /// a JSON object (or `null`, which clears the variables).
    pub fn with_variables<T: Serialize + ?Sized>(
        mut self,
        variables: &T,
    ) -> Result<Self, BuildError> {
        self.variables = match serde_json::to_value(variables).map_err(BuildError::Serialize)? {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => return Err(BuildError::VariablesNotObject),
        };
        Ok(self)
    }

    /// Returns the operation name used when rendering errors.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.operation_name
    }

    /// Encodes the operation as a JSON request body.
    ///
    /// Uploads are ignored; send them with [`upload_payload`](Self::upload_payload).
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Serialize`] if a variable cannot be serialized.
    pub fn to_json_body(&self) -> Result<Vec<u8>, BuildError> {
        serde_json::to_vec(&self.wire(&self.variables)).map_err(BuildError::Serialize)
    }

    /// Builds the multipart upload payload, leaving `self` unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoUploads`] if the operation has no uploads, or
    /// [`BuildError::TooManyUploads`] if `mode` is [`UploadMode::Single`] and
    /// there is more than one.
    pub fn upload_payload(&self, mode: UploadMode) -> Result<UploadPayload, BuildError> {
        let (operations, map) = self.placeholders(mode)?;
        Ok(UploadPayload {
            operations,
            map,
            files: self.uploads.clone(),
        })
    }

    /// Like [`upload_payload`](Self::upload_payload) but moves the upload
    /// contents instead of copying them.
    ///
    /// # Errors
    ///
    /// Same as [`upload_payload`](Self::upload_payload).
    pub fn into_upload_payload(self, mode: UploadMode) -> Result<UploadPayload, BuildError> {
        let (operations, map) = self.placeholders(mode)?;
        Ok(UploadPayload {
            operations,
            map,
            files: self.uploads,
        })
    }

    fn wire<'a>(&'a self, variables: &'a Map<String, Value>) -> WireOperation<'a> {
        WireOperation {
            operation_name: &self.operation_name,
            query: &self.query,
            variables,
        }
    }

    fn placeholders(
        &self,
        mode: UploadMode,
    ) -> Result<(Value, BTreeMap<String, Vec<String>>), BuildError> {
        let count = self.uploads.len();
        if count == 0 {
            return Err(BuildError::NoUploads);
        }

        let mut variables = Map::new();
        let mut map = BTreeMap::new();
        match mode {
            UploadMode::Single => {
                if count > 1 {
                    return Err(BuildError::TooManyUploads { count });
                }
                variables.insert("file".to_string(), Value::Null);
                map.insert("0".to_string(), vec!["variables.file".to_string()]);
            }
            UploadMode::Multiple => {
                variables.insert("files".to_string(), Value::Array(vec![Value::Null; count]));
                for i in 0..count {
                    map.insert(i.to_string(), vec![format!("variables.files.{i}")]);
                }
            }
        }

        let operations =
            serde_json::to_value(self.wire(&variables)).map_err(BuildError::Serialize)?;
        Ok((operations, map))
    }
}

/// The multipart encoding of an upload operation.
///
/// Holds the three kinds of parts before they are assembled into a
/// [`reqwest::multipart::Form`]: the `operations` document, the `map` from
/// part index to placeholder path, and the files themselves in index order.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadPayload {
    operations: Value,
    map: BTreeMap<String, Vec<String>>,
    files: Vec<Upload>,
}

impl UploadPayload {
    /// Returns the `operations` document with placeholder variables.
    #[must_use]
    pub const fn operations(&self) -> &Value {
        &self.operations
    }

    /// Returns the `map` from part index to placeholder path.
    #[must_use]
    pub const fn map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.map
    }

    /// Returns the files, where file `i` is sent as part `"i"`.
    #[must_use]
    pub fn files(&self) -> &[Upload] {
        &self.files
    }

    /// Assembles the multipart form.
    ///
    /// Parts are written in order: `operations`, `map`, then `"0"`, `"1"`, ….
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Serialize`] if a JSON part cannot be serialized,
    /// or [`BuildError::InvalidMimeType`] if an upload's mime type is not valid.
    pub fn into_form(self) -> Result<Form, BuildError> {
        let operations = serde_json::to_string(&self.operations).map_err(BuildError::Serialize)?;
        let map = serde_json::to_string(&self.map).map_err(BuildError::Serialize)?;

        let mut form = Form::new().text("operations", operations).text("map", map);
        for (i, upload) in self.files.into_iter().enumerate() {
            let (file_name, content, mime_type) = upload.into_parts();
            let mime_type = mime_type.unwrap_or_else(|| DEFAULT_FILE_CONTENT_TYPE.to_string());
            let part = Part::bytes(content)
                .file_name(file_name)
                .mime_str(&mime_type)
                .map_err(|source| BuildError::InvalidMimeType {
                    mime_type: mime_type.clone(),
                    source,
                })?;
            form = form.part(i.to_string(), part);
        }
        Ok(form)
    }
}
