//! The document a conversion reads from.

use std::fs;
use std::path::Path;

use crate::error::{ConversionError, Result};
use crate::multipart::MultipartForm;
use crate::options::validate_http_url;

/// Exactly one input for a conversion request.
///
/// Each constructor validates its input before anything touches the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// Raw HTML sent as a text field.
    Html(String),

    /// Page the service fetches itself.
    Uri(String),

    /// Local file uploaded as a file part.
    File {
        /// Name sent in the part's `filename` parameter.
        filename: String,
        /// Guessed from the file extension.
        content_type: String,
        /// Entire file content.
        content: Vec<u8>,
    },
}

impl ContentSource {
    /// Raw HTML. Blank input is rejected.
    pub fn html<S: Into<String>>(html: S) -> Result<Self> {
        let html = html.into();
        if html.trim().is_empty() {
            return Err(ConversionError::usage("HTML content must not be empty"));
        }
        Ok(Self::Html(html))
    }

    /// An absolute `http` or `https` URI.
    pub fn uri(uri: &str) -> Result<Self> {
        let parsed = validate_http_url("URI", uri)?;
        if parsed.host_str().is_none() {
            return Err(ConversionError::usage(format!("invalid URI '{}': missing host", uri)));
        }
        Ok(Self::Uri(uri.to_string()))
    }

    /// Read a local file fully into memory.
    ///
    /// # Errors
    ///
    /// Returns a usage error if `path` doesn't exist, isn't a regular file or
    /// can't be read.
    pub fn file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let metadata = fs::metadata(path).map_err(|e| {
            ConversionError::usage(format!("cannot access file {}: {}", path.display(), e))
        })?;
        if !metadata.is_file() {
            return Err(ConversionError::usage(format!(
                "not a regular file: {}",
                path.display()
            )));
        }

        let content = fs::read(path).map_err(|e| {
            ConversionError::usage(format!("cannot read file {}: {}", path.display(), e))
        })?;

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        log::debug!(
            "Read {} ({} bytes, {})",
            path.display(),
            content.len(),
            content_type
        );

        Ok(Self::File {
            filename,
            content_type,
            content,
        })
    }

    /// Last path segment of the conversion endpoint.
    pub fn endpoint_suffix(&self) -> &'static str {
        match self {
            Self::Html(_) => "html/",
            Self::Uri(_) => "uri/",
            Self::File { .. } => "upload/",
        }
    }

    /// Short label for log lines. Never includes the content.
    pub fn describe(&self) -> String {
        match self {
            Self::Html(html) => format!("HTML ({} bytes)", html.len()),
            Self::Uri(uri) => format!("URI {}", uri),
            Self::File {
                filename, content, ..
            } => format!("file {} ({} bytes)", filename, content.len()),
        }
    }

    /// Append the `src` field.
    pub(crate) fn write_to(&self, form: &mut MultipartForm) {
        match self {
            Self::Html(html) => {
                form.text("src", html);
            }
            Self::Uri(uri) => {
                form.text("src", uri);
            }
            Self::File {
                filename,
                content_type,
                content,
            } => {
                form.file("src", filename, content_type, content);
            }
        }
    }
}
