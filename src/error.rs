//! Structured errors for conversion requests.
//!
//! This module provides [`ConversionError`], the single error type returned by
//! every fallible operation in the crate, and a convenient [`Result`] alias.
//!
//! The conversion service reports failures as a plain-text body shaped like:
//!
//! ```text
//! <http_code>.<reason_code> - <message> [Documentation link: <url>]
//! ```
//!
//! [`ConversionError::from_response`] decomposes such a body into its parts.
//! Bodies that don't follow the grammar (proxies, load balancers, transport
//! failures) are kept verbatim with a reason code of `-1`.
//!
//! # Example
//!
//! ```rust
//! use html2pdf_client::{ConversionError, ErrorKind};
//!
//! let err = ConversionError::from_response(
//!     "400.12 - Invalid page size. Documentation link: http://example.com/d1",
//!     Some(400),
//! );
//!
//! assert_eq!(err.kind(), ErrorKind::Service);
//! assert_eq!(err.status_code(), Some(400));
//! assert_eq!(err.reason_code(), 12);
//! assert_eq!(err.message(), "Invalid page size.");
//! assert_eq!(err.documentation_link(), "http://example.com/d1");
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Grammar of a structured service error. `(?s)` lets the message span lines.
static SERVICE_ERROR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(\d+)\.(\d+)\s-\s(.*?)(?:\sDocumentation link:\s(.*))?$")
        .expect("service error pattern is valid")
});

/// Reason code used whenever an error did not come from the service's
/// structured error path.
pub const UNSTRUCTURED_REASON_CODE: i32 = -1;

/// Broad classification of a [`ConversionError`].
///
/// | Kind | Raised when | Network touched? |
/// |------|-------------|------------------|
/// | `Service` | Service answered with a structured error body | Yes |
/// | `Unstructured` | Service answered non-2xx with a free-form body | Yes |
/// | `Transport` | DNS, connect, TLS or timeout failure | Attempted |
/// | `Usage` | Bad credentials, option, URI, HTML or file | No |
/// | `Io` | The caller's sink rejected output bytes | Yes |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The body matched the structured error grammar.
    Service,

    /// Non-2xx response whose body did not match the grammar.
    Unstructured,

    /// No HTTP response was received.
    Transport,

    /// Invalid input detected before any network I/O.
    Usage,

    /// Writing the converted output failed.
    Io,
}

impl ErrorKind {
    /// Returns a stable, machine-readable name for the kind.
    ///
    /// ```rust
    /// use html2pdf_client::ErrorKind;
    ///
    /// assert_eq!(ErrorKind::Transport.as_str(), "TRANSPORT");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "SERVICE",
            Self::Unstructured => "UNSTRUCTURED",
            Self::Transport => "TRANSPORT",
            Self::Usage => "USAGE",
            Self::Io => "IO",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured conversion failure.
///
/// Every failure surfaces as this type, whatever its origin; use
/// [`kind()`](Self::kind) to tell them apart.
///
/// # Fields Overview
///
/// | Accessor | Structured body | Anything else |
/// |----------|-----------------|---------------|
/// | [`status_code()`](Self::status_code) | `<http_code>` | Observed HTTP status, if any |
/// | [`reason_code()`](Self::reason_code) | `<reason_code>` | `-1` |
/// | [`message()`](Self::message) | `<message>` | Raw text verbatim |
/// | [`documentation_link()`](Self::documentation_link) | `<url>` or `""` | `""` |
/// | [`error_string()`](Self::error_string) | Raw text | `"<status> - <raw>"` or raw text |
///
/// # Example
///
/// ```rust
/// use html2pdf_client::{ConversionError, ErrorKind};
///
/// let err = ConversionError::from_response("Connection refused", None);
///
/// assert_eq!(err.kind(), ErrorKind::Unstructured);
/// assert_eq!(err.status_code(), None);
/// assert_eq!(err.reason_code(), -1);
/// assert_eq!(err.to_string(), "Connection refused");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{error}")]
pub struct ConversionError {
    kind: ErrorKind,
    error: String,
    status_code: Option<u16>,
    reason_code: i32,
    message: String,
    doc_link: String,
}

impl ConversionError {
    /// Build a structured error from a raw error body and the HTTP status it
    /// arrived with.
    ///
    /// If `raw` matches the service grammar, status, reason, message and
    /// documentation link are taken from it and the full error string is
    /// `raw` itself. Otherwise the supplied `status` is kept, the reason code
    /// is `-1`, the message is `raw` unchanged and the full error string
    /// becomes `"<status> - <raw>"` (or stays `raw` when no status is known).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use html2pdf_client::ConversionError;
    ///
    /// let err = ConversionError::from_response("Service Unavailable", Some(503));
    /// assert_eq!(err.reason_code(), -1);
    /// assert_eq!(err.message(), "Service Unavailable");
    /// assert_eq!(err.error_string(), "503 - Service Unavailable");
    /// ```
    pub fn from_response(raw: &str, status: Option<u16>) -> Self {
        if let Some(parsed) = parse_service_error(raw) {
            return parsed;
        }

        let error = match status {
            Some(code) => format!("{} - {}", code, raw),
            None => raw.to_string(),
        };

        Self {
            kind: ErrorKind::Unstructured,
            error,
            status_code: status,
            reason_code: UNSTRUCTURED_REASON_CODE,
            message: raw.to_string(),
            doc_link: String::new(),
        }
    }

    /// Error for a failure that happened before any HTTP response arrived.
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::unstructured(ErrorKind::Transport, message.into())
    }

    /// Error for invalid input rejected before any network I/O.
    ///
    /// ```rust
    /// use html2pdf_client::{ConversionError, ErrorKind};
    ///
    /// let err = ConversionError::usage("API key is required");
    /// assert_eq!(err.kind(), ErrorKind::Usage);
    /// assert_eq!(err.to_string(), "API key is required");
    /// ```
    pub fn usage<S: Into<String>>(message: S) -> Self {
        Self::unstructured(ErrorKind::Usage, message.into())
    }

    /// Error for output that could not be written to the caller's sink.
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::unstructured(ErrorKind::Io, message.into())
    }

    fn unstructured(kind: ErrorKind, message: String) -> Self {
        Self {
            kind,
            error: message.clone(),
            status_code: None,
            reason_code: UNSTRUCTURED_REASON_CODE,
            message,
            doc_link: String::new(),
        }
    }

    /// Classification of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP status code reported by the service, if any.
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// HTTP status code reported by the service, if any.
    ///
    /// Legacy name of [`status_code()`](Self::status_code), kept so existing
    /// callers keep compiling.
    #[deprecated(since = "0.1.0", note = "use `status_code()` instead")]
    pub fn code(&self) -> Option<u16> {
        self.status_code()
    }

    /// Service-specific reason code, or `-1` for unstructured errors.
    pub fn reason_code(&self) -> i32 {
        self.reason_code
    }

    /// Human-readable message without the status/reason prefix.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Documentation URL attached by the service, or `""`.
    pub fn documentation_link(&self) -> &str {
        &self.doc_link
    }

    /// The full error string, identical to the [`Display`](fmt::Display) output.
    pub fn error_string(&self) -> &str {
        &self.error
    }

    /// Returns `true` if the service produced a structured error body.
    pub fn is_service_error(&self) -> bool {
        self.kind == ErrorKind::Service
    }

    /// Returns `true` if the error was raised before any request was sent.
    pub fn is_usage_error(&self) -> bool {
        self.kind == ErrorKind::Usage
    }
}

fn parse_service_error(raw: &str) -> Option<ConversionError> {
    let caps = SERVICE_ERROR.captures(raw)?;

    // Numbers too large for the field types fall back to the unstructured path.
    let status_code: u16 = caps[1].parse().ok()?;
    let reason_code: i32 = caps[2].parse().ok()?;

    Some(ConversionError {
        kind: ErrorKind::Service,
        error: raw.to_string(),
        status_code: Some(status_code),
        reason_code,
        message: caps[3].to_string(),
        doc_link: caps
            .get(4)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
    })
}

/// Convenience conversion from [`String`] to a usage error.
///
/// ```rust
/// use html2pdf_client::{ConversionError, ErrorKind};
///
/// let error: ConversionError = "invalid configuration".to_string().into();
/// assert_eq!(error.kind(), ErrorKind::Usage);
/// ```
impl From<String> for ConversionError {
    fn from(msg: String) -> Self {
        ConversionError::usage(msg)
    }
}

/// Convenience conversion from `&str` to a usage error.
impl From<&str> for ConversionError {
    fn from(msg: &str) -> Self {
        ConversionError::usage(msg)
    }
}

/// Result type alias using [`ConversionError`].
pub type Result<T> = std::result::Result<T, ConversionError>;

// ============================================================================
// Unit Tests
// ============================================================================
