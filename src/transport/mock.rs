//! Mock transport for testing.
//!
//! This module provides a mock implementation of [`Transport`] that replays
//! canned responses or failures and records every request it receives,
//! useful for testing client behavior without a network.
//!
//! # Feature Flag
//!
//! This module is only available when:
//! - The `test-utils` feature is enabled, OR
//! - During testing (`#[cfg(test)]`)
//!
//! # Example
//!
//! ```rust,ignore
//! use html2pdf_client::transport::mock::MockTransport;
//!
//! // Every request gets the same PDF
//! let transport = MockTransport::responding(200, b"%PDF-1.4".to_vec());
//!
//! // Primary port refuses, fallback answers
//! let transport = MockTransport::new()
//!     .then_fail(FailureKind::Connect, "connection refused")
//!     .then_respond(200, b"%PDF-1.4".to_vec());
//! ```

use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{FailureKind, HttpRequest, HttpResponse, Transport, TransportFailure};

#[derive(Debug, Clone)]
enum Reply {
    Respond(u16, Vec<u8>),
    Fail(FailureKind, String),
}

impl Reply {
    fn into_result(self) -> Result<HttpResponse, TransportFailure> {
        match self {
            Reply::Respond(status, body) => Ok(HttpResponse::new(status, Cursor::new(body))),
            Reply::Fail(kind, message) => Err(TransportFailure::new(kind, message)),
        }
    }
}

/// Mock transport for testing without a server.
///
/// Queued replies are used first, in order. Once the queue is empty every
/// request gets the default reply (`200` with an empty body unless set
/// otherwise).
///
/// # Thread Safety
///
/// This transport is `Send + Sync`; state sits behind a mutex and an atomic
/// counter.
pub struct MockTransport {
    queue: Mutex<VecDeque<Reply>>,
    default_reply: Reply,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    request_count: Arc<AtomicUsize>,
}

impl MockTransport {
    /// Create a mock that answers `200` with an empty body.
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            default_reply: Reply::Respond(200, Vec::new()),
            requests: Arc::new(Mutex::new(Vec::new())),
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock that always answers with `status` and `body`.
    pub fn responding<B: Into<Vec<u8>>>(status: u16, body: B) -> Self {
        Self {
            default_reply: Reply::Respond(status, body.into()),
            ..Self::new()
        }
    }

    /// Create a mock that always fails before a response.
    pub fn failing<S: Into<String>>(kind: FailureKind, message: S) -> Self {
        Self {
            default_reply: Reply::Fail(kind, message.into()),
            ..Self::new()
        }
    }

    /// Queue a response for the next unanswered request.
    pub fn then_respond<B: Into<Vec<u8>>>(self, status: u16, body: B) -> Self {
        self.push(Reply::Respond(status, body.into()))
    }

    /// Queue a failure for the next unanswered request.
    pub fn then_fail<S: Into<String>>(self, kind: FailureKind, message: S) -> Self {
        self.push(Reply::Fail(kind, message.into()))
    }

    fn push(self, reply: Reply) -> Self {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(reply);
        }
        self
    }

    /// Number of requests received.
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Get a clone of the request counter for external tracking.
    ///
    /// This allows test code to monitor calls after the transport has been
    /// moved into a client.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.request_count)
    }

    /// Get a handle on the recorded requests, usable after the transport has
    /// been moved into a client.
    pub fn recorder(&self) -> Arc<Mutex<Vec<HttpRequest>>> {
        Arc::clone(&self.requests)
    }

    /// Copies of the requests received so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportFailure> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;
        log::debug!("MockTransport: request #{} to {}", count, request.url);

        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let queued = self.queue.lock().ok().and_then(|mut q| q.pop_front());
        queued
            .unwrap_or_else(|| self.default_reply.clone())
            .into_result()
    }
}
