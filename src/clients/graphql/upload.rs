//! Binary attachments for multipart upload operations.

use std::io::Read;
use std::path::Path;

/// A named binary attachment sent as one file part of an upload operation.
///
/// The content is held in memory; it is sent verbatim under `file_name`.
///
/// # Example
///
/// ```rust
/// use graphql_upload_client::Upload;
///
/// let upload = Upload::new("hello.txt", b"hello".to_vec()).with_mime_type("text/plain");
/// assert_eq!(upload.file_name(), "hello.txt");
/// assert_eq!(upload.content(), b"hello");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Upload {
    file_name: String,
    content: Vec<u8>,
    mime_type: Option<String>,
}

impl Upload {
    /// Creates an upload from in-memory bytes.
    #[must_use]
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
            mime_type: None,
        }
    }

    /// Creates an upload by reading `reader` to completion.
    ///
    /// # Errors
    ///
    /// Returns the reader's I/O error.
    pub fn from_reader(
        file_name: impl Into<String>,
        mut reader: impl Read,
    ) -> std::io::Result<Self> {
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;
        Ok(Self::new(file_name, content))
    }

    /// Reads a file from disk, naming the upload after the file.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be read.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(String::new, |name| name.to_string_lossy().into_owned());
        Ok(Self::new(file_name, content))
    }

    /// Sets the content type of the file part.
    ///
    /// The value is checked when the multipart form is built.
    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Returns the file name sent with the part.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the raw content.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Returns the content type, if set.
    #[must_use]
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub(crate) fn into_parts(self) -> (String, Vec<u8>, Option<String>) {
        (self.file_name, self.content, self.mime_type)
    }
}
