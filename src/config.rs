//! Process-wide audit configuration

use crate::http::{AuditRequest, AuditResponse};
use crate::level::AuditLevel;
use crate::redact::RedactionPolicy;

/// Immutable configuration shared read-only by every session: the verbosity
/// level and the redaction policy. Built once at startup.
#[derive(Debug, Clone, Default)]
pub struct AuditConfig {
    pub level: AuditLevel,
    pub policy: RedactionPolicy,
}

impl AuditConfig {
    /// Configuration at the given level with the default redaction policy.
    pub fn new(level: AuditLevel) -> Self {
        Self {
            level,
            policy: RedactionPolicy::default(),
        }
    }

    /// Replace the redaction policy.
    pub fn with_policy(mut self, policy: RedactionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Whether the body of an incoming request should be captured at session
    /// start: the level must admit request bodies, the method must be a
    /// state-changing one, and the declared content type must be JSON.
    pub fn captures_request_body(&self, request: &AuditRequest) -> bool {
        self.level >= AuditLevel::Request && request.has_body_method() && request.is_json()
    }

    /// Whether a response body should be embedded in the record: the level
    /// must admit response bodies, the response content type must be JSON,
    /// and the body must be non-empty.
    pub fn includes_response_body(&self, response: &AuditResponse) -> bool {
        self.level >= AuditLevel::RequestResponse && response.is_json() && !response.body.is_empty()
    }
}
