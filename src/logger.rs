//! Audit logger
//!
//! Main interface: holds the process-wide configuration and the sink, and
//! opens one [`AuditSession`] per inbound request.

use crate::body;
use crate::config::AuditConfig;
use crate::error::{AuditError, Result};
use crate::http::AuditRequest;
use crate::level::AuditLevel;
use crate::record::AuditRecord;
use crate::redact::RedactionPolicy;
use crate::session::AuditSession;
use crate::sink::AuditSink;
use bytes::Bytes;
use std::sync::Arc;

/// Audit logger
///
/// Cheap to share behind an `Arc`; every session reads the same immutable
/// configuration.
pub struct AuditLogger {
    config: Arc<AuditConfig>,
    sink: Arc<dyn AuditSink>,
}

impl AuditLogger {
    /// Create a new audit logger builder
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use http_audit::*;
    ///
    /// let logger = AuditLogger::builder()
    ///     .level(AuditLevel::Request)
    ///     .sink(FileSink::new("audit.log"))
    ///     .build();
    /// ```
    pub fn builder() -> AuditLoggerBuilder {
        AuditLoggerBuilder::new()
    }

    /// Open a session for an inbound request.
    ///
    /// Captures the request metadata and headers now. When the level, the
    /// method, and the content type all call for it, the body is buffered
    /// here and the request's stream is restored, so the downstream handler
    /// reads exactly the bytes the client sent.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use http_audit::*;
    ///
    /// # async fn example() -> http_audit::Result<()> {
    /// let logger = AuditLogger::builder()
    ///     .level(AuditLevel::RequestResponse)
    ///     .sink(StdoutSink::new())
    ///     .build();
    ///
    /// let mut request = AuditRequest::new("POST", "/v3/clusters")
    ///     .with_header("Content-Type", "application/json")
    ///     .with_body(r#"{"name":"demo"}"#);
    ///
    /// let session = logger.begin(&mut request).await?;
    /// // ...hand the request to the application, collect its response...
    /// let response = AuditResponse::new(201)
    ///     .with_header("Content-Type", "application/json")
    ///     .with_body(r#"{"id":"c-1"}"#);
    /// session.finish(None, &response).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn begin(&self, request: &mut AuditRequest) -> Result<AuditSession> {
        let record = AuditRecord::new(
            request.method.clone(),
            request.uri.clone(),
            request.remote_addr.clone(),
        );
        let request_headers = request.headers.clone();

        let request_body = if self.config.captures_request_body(request) {
            body::capture(request).await?
        } else {
            Bytes::new()
        };

        Ok(AuditSession::new(
            record,
            request_headers,
            request_body,
            Arc::clone(&self.config),
            Arc::clone(&self.sink),
        ))
    }

    /// Flush the sink.
    pub async fn flush(&self) -> Result<()> {
        self.sink.flush().await.map_err(AuditError::Sink)
    }

    /// Configured verbosity level.
    pub fn level(&self) -> AuditLevel {
        self.config.level
    }

    /// The full configuration sessions run under.
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }
}

/// Audit logger builder
pub struct AuditLoggerBuilder {
    level: AuditLevel,
    policy: RedactionPolicy,
    sink: Option<Arc<dyn AuditSink>>,
}

impl AuditLoggerBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            level: AuditLevel::default(),
            policy: RedactionPolicy::default(),
            sink: None,
        }
    }

    /// Set the verbosity level
    pub fn level(mut self, level: AuditLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the redaction policy
    pub fn policy(mut self, policy: RedactionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the output sink
    pub fn sink(mut self, sink: impl AuditSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Build the audit logger
    pub fn build(self) -> AuditLogger {
        AuditLogger {
            config: Arc::new(AuditConfig {
                level: self.level,
                policy: self.policy,
            }),
            sink: self.sink.expect("Sink must be set"),
        }
    }
}

impl Default for AuditLoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
