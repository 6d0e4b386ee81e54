//! Transport implementations.
//!
//! This module provides the [`Transport`] trait and its implementations for
//! delivering one prepared request to the conversion service.
//!
//! # Overview
//!
//! The transport is the only part of the crate that touches the network.
//! Putting it behind a trait allows:
//! - Swapping the HTTP stack without touching request assembly
//! - Mock transports for testing client behavior offline
//!
//! # Available Transports
//!
//! | Transport | Description |
//! |-----------|-------------|
//! | [`HttpTransport`] | Blocking HTTP/HTTPS via `ureq` |
//! | [`mock::MockTransport`] | For testing (feature-gated) |
//!
//! # Custom Transport
//!
//! ```rust
//! use std::io::Cursor;
//! use html2pdf_client::transport::{HttpRequest, HttpResponse, Transport, TransportFailure};
//!
//! struct AlwaysEmpty;
//!
//! impl Transport for AlwaysEmpty {
//!     fn send(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportFailure> {
//!         Ok(HttpResponse::new(200, Cursor::new(Vec::new())))
//!     }
//! }
//! ```

mod http;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use http::HttpTransport;

use std::fmt;
use std::io::Read;

use crate::error::ConversionError;

/// One fully assembled POST request.
#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Absolute URL including scheme and port.
    pub url: String,

    /// `Content-Type` header value.
    pub content_type: String,

    /// Encoded body.
    pub body: Vec<u8>,
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The body carries the API key.
        f.debug_struct("HttpRequest")
            .field("url", &self.url)
            .field("content_type", &self.content_type)
            .field("body_len", &self.body.len())
            .finish()
    }
}

/// Response status plus a reader over the (not yet consumed) body.
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,

    /// Response body. Reading it may still fail with a transport error.
    pub body: Box<dyn Read>,
}

impl HttpResponse {
    /// Wrap a status and body reader.
    pub fn new<R: Read + 'static>(status: u16, body: R) -> Self {
        Self {
            status,
            body: Box::new(body),
        }
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Stage at which a request failed without producing a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Host name could not be resolved.
    Dns,

    /// The TCP connection could not be established.
    Connect,

    /// A connect or read timeout expired.
    Timeout,

    /// TLS handshake or certificate failure.
    Tls,

    /// Any other I/O failure while sending or receiving.
    Io,

    /// The transport could not be set up (bad proxy, unreadable certificate).
    Setup,
}

/// A request that never produced an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportFailure {
    /// Failure stage.
    pub kind: FailureKind,

    /// Description of the failure.
    pub message: String,
}

impl TransportFailure {
    /// Create a failure of the given kind.
    pub fn new<S: Into<String>>(kind: FailureKind, message: S) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns `true` if the failure happened while connecting, so a
    /// different port might succeed.
    pub fn is_connect_failure(&self) -> bool {
        self.kind == FailureKind::Connect
    }
}

impl From<TransportFailure> for ConversionError {
    fn from(failure: TransportFailure) -> Self {
        match failure.kind {
            FailureKind::Setup => ConversionError::usage(failure.message),
            _ => ConversionError::transport(failure.message),
        }
    }
}

/// Sends one prepared request.
///
/// # Thread Safety
///
/// This trait requires `Send + Sync` so a [`Client`](crate::Client) holding a
/// boxed transport can be moved and shared across threads.
///
/// # Implementors
///
/// - [`HttpTransport`] - Blocking HTTP/HTTPS
/// - [`mock::MockTransport`] - For testing (when `test-utils` feature enabled)
pub trait Transport: Send + Sync {
    /// Send `request` and return the status and body of the response.
    ///
    /// Any HTTP status, including 4xx and 5xx, is a successful send.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportFailure`] if no response was received.
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportFailure>;
}
