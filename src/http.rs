//! Request and response descriptors consumed by the audit pipeline
//!
//! These are the interfaces the core needs from its collaborators: the
//! server hands an [`AuditRequest`] to [`AuditLogger::begin`] at request
//! arrival and an [`AuditResponse`] to [`AuditSession::finish`] once the
//! handler chain has produced a result.
//!
//! [`AuditLogger::begin`]: crate::AuditLogger::begin
//! [`AuditSession::finish`]: crate::AuditSession::finish

use crate::headers::{self, HeaderMap};
use bytes::Bytes;
use std::io::Cursor;
use tokio::io::AsyncRead;

/// The content type that enables body capture. Compared for exact equality,
/// so a declared charset suffix opts the body out of auditing.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Methods that may carry a request body worth auditing.
pub const BODY_METHODS: &[&str] = &["PUT", "POST"];

/// A one-shot readable body source.
///
/// Reading consumes it; body capture replaces it in place with a rewindable
/// buffer over the identical bytes (see [`crate::body::capture`]).
pub type BodyStream = Box<dyn AsyncRead + Send + Unpin>;

/// Inbound request descriptor.
///
/// Owned by the integrating server; the audit pipeline only ever mutates the
/// `body` field, and only to replace a drained stream with an equivalent
/// re-readable one.
pub struct AuditRequest {
    pub method: String,
    pub uri: String,
    pub remote_addr: String,
    pub headers: HeaderMap,
    pub body: Option<BodyStream>,
}

impl AuditRequest {
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            remote_addr: String::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Set the remote address.
    pub fn with_remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.remote_addr = addr.into();
        self
    }

    /// Append a header value.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Set the body from in-memory bytes, wrapped as a readable stream.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(Box::new(Cursor::new(body.into())));
        self
    }

    /// Set the body from an arbitrary one-shot stream.
    pub fn with_body_stream(mut self, stream: BodyStream) -> Self {
        self.body = Some(stream);
        self
    }

    /// Declared content type, if any.
    pub fn content_type(&self) -> Option<&str> {
        headers::first_value(&self.headers, "Content-Type")
    }

    /// Whether the declared content type is exactly JSON.
    pub fn is_json(&self) -> bool {
        self.content_type() == Some(CONTENT_TYPE_JSON)
    }

    /// Whether the method is one that may carry an auditable body.
    pub fn has_body_method(&self) -> bool {
        BODY_METHODS.contains(&self.method.as_str())
    }
}

impl std::fmt::Debug for AuditRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditRequest")
            .field("method", &self.method)
            .field("uri", &self.uri)
            .field("remote_addr", &self.remote_addr)
            .field("headers", &self.headers.len())
            .field("body", &self.body.is_some())
            .finish()
    }
}

/// Completed response descriptor, supplied at finalize time.
#[derive(Debug, Clone, Default)]
pub struct AuditResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl AuditResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Append a header value.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Set the response body bytes.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Declared content type, if any.
    pub fn content_type(&self) -> Option<&str> {
        headers::first_value(&self.headers, "Content-Type")
    }

    /// Whether the declared content type is exactly JSON.
    pub fn is_json(&self) -> bool {
        self.content_type() == Some(CONTENT_TYPE_JSON)
    }
}
