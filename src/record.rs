//! Audit record structure and single-line assembly

use crate::error::{AuditError, Result};
use crate::headers::HeaderMap;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// The authenticated identity attached to a record.
///
/// `request_user` and `request_groups` carry the impersonated identity when
/// the caller acted on another principal's behalf.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuditUser {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub group: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub request_user: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub request_groups: Vec<String>,
}

impl AuditUser {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_request_user(mut self, user: impl Into<String>) -> Self {
        self.request_user = user.into();
        self
    }

    pub fn with_request_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request_groups = groups.into_iter().map(Into::into).collect();
        self
    }
}

/// Metadata for one audited exchange. Empty fields are omitted from the
/// wire form; bodies are never fields here, they are spliced in raw by
/// [`assemble`] so their JSON embeds without re-encoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuditRecord {
    #[serde(rename = "auditID", skip_serializing_if = "String::is_empty")]
    pub audit_id: String,
    #[serde(rename = "requestURI", skip_serializing_if = "String::is_empty")]
    pub request_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AuditUser>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub method: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub remote_addr: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub request_timestamp: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub response_timestamp: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub response_code: u16,
    #[serde(skip_serializing_if = "HeaderMap::is_empty")]
    pub request_header: HeaderMap,
    #[serde(skip_serializing_if = "HeaderMap::is_empty")]
    pub response_header: HeaderMap,
}

fn is_zero(code: &u16) -> bool {
    *code == 0
}

impl AuditRecord {
    /// Fresh record for an incoming request: random id, request timestamp
    /// taken now. Response-side fields stay empty until completion.
    pub fn new(
        method: impl Into<String>,
        request_uri: impl Into<String>,
        remote_addr: impl Into<String>,
    ) -> Self {
        Self {
            audit_id: Uuid::new_v4().to_string(),
            request_uri: request_uri.into(),
            method: method.into(),
            remote_addr: remote_addr.into(),
            request_timestamp: now_rfc3339(),
            ..Self::default()
        }
    }
}

/// Current time as an RFC 3339 string with seconds precision, UTC.
pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Assemble the final wire line: metadata plus optional raw body fragments,
/// compacted, newline-terminated.
///
/// The record is serialized on its own, then each provided fragment is
/// spliced in under `requestBody` / `responseBody` without re-encoding.
/// Re-parsing the spliced buffer both compacts it to a single line and
/// validates it; a fragment that is not well-formed JSON makes the whole
/// record fail with [`AuditError::InvalidRecord`] so nothing malformed
/// reaches the sink.
pub fn assemble(
    record: &AuditRecord,
    request_body: Option<&[u8]>,
    response_body: Option<&[u8]>,
) -> Result<Vec<u8>> {
    let mut buf = serde_json::to_vec(record).map_err(AuditError::Serialize)?;
    if buf.last() == Some(&b'}') {
        buf.pop();
    }

    if let Some(body) = request_body {
        buf.extend_from_slice(b",\"requestBody\":");
        buf.extend_from_slice(trim_trailing_newline(body));
    }
    if let Some(body) = response_body {
        buf.extend_from_slice(b",\"responseBody\":");
        buf.extend_from_slice(trim_trailing_newline(body));
    }
    buf.push(b'}');

    let value: Value = serde_json::from_slice(&buf).map_err(AuditError::InvalidRecord)?;
    let mut line = serde_json::to_vec(&value).map_err(AuditError::Serialize)?;
    line.push(b'\n');
    Ok(line)
}

fn trim_trailing_newline(body: &[u8]) -> &[u8] {
    body.strip_suffix(b"\n").unwrap_or(body)
}
