//! Per-request audit session

use crate::config::AuditConfig;
use crate::error::{AuditError, Result};
use crate::headers::{
    filter_headers, HeaderMap, REQUEST_HEADER_DENYLIST, RESPONSE_HEADER_DENYLIST,
};
use crate::http::AuditResponse;
use crate::level::AuditLevel;
use crate::record::{assemble, now_rfc3339, AuditRecord, AuditUser};
use crate::redact::redact;
use crate::sink::AuditSink;
use bytes::Bytes;
use std::sync::Arc;

/// The per-request handle: created when a request arrives, finished exactly
/// once when its response completes.
///
/// A session owns its captured request body and its record-in-progress;
/// sessions share nothing with each other but the sink. [`finish`] consumes
/// the session, so a record cannot be written twice.
///
/// [`finish`]: AuditSession::finish
pub struct AuditSession {
    record: AuditRecord,
    request_headers: HeaderMap,
    request_body: Bytes,
    config: Arc<AuditConfig>,
    sink: Arc<dyn AuditSink>,
}

impl AuditSession {
    pub(crate) fn new(
        record: AuditRecord,
        request_headers: HeaderMap,
        request_body: Bytes,
        config: Arc<AuditConfig>,
        sink: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            record,
            request_headers,
            request_body,
            config,
            sink,
        }
    }

    /// Identifier of the record this session will write.
    pub fn audit_id(&self) -> &str {
        &self.record.audit_id
    }

    /// Merge the response side into the record, redact whatever bodies the
    /// level admits, and write the finished line to the sink.
    ///
    /// Dropping a session without calling this writes nothing, which is the
    /// intended outcome for aborted requests. At [`AuditLevel::None`] this is
    /// a no-op that still reports success.
    pub async fn finish(mut self, user: Option<AuditUser>, response: &AuditResponse) -> Result<()> {
        if self.config.level == AuditLevel::None {
            return Ok(());
        }

        self.record.user = user;
        self.record.response_timestamp = now_rfc3339();
        self.record.response_code = response.status;
        self.record.request_header =
            filter_headers(&self.request_headers, REQUEST_HEADER_DENYLIST);
        self.record.response_header = filter_headers(&response.headers, RESPONSE_HEADER_DENYLIST);

        let request_fragment =
            if self.config.level >= AuditLevel::Request && !self.request_body.is_empty() {
                Some(redact(
                    &self.record.request_uri,
                    &self.request_body,
                    &self.config.policy,
                )?)
            } else {
                None
            };

        let response_fragment = if self.config.includes_response_body(response) {
            Some(redact(
                &self.record.request_uri,
                &response.body,
                &self.config.policy,
            )?)
        } else {
            None
        };

        let line = assemble(
            &self.record,
            request_fragment.as_deref(),
            response_fragment.as_deref(),
        )?;

        self.sink.write(&line).await.map_err(AuditError::Sink)?;
        tracing::debug!("audit record {} written", self.record.audit_id);

        Ok(())
    }
}
