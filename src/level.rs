//! Audit verbosity levels

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How much of a request/response cycle is captured in the audit record.
///
/// Levels are strictly ordered; each level captures everything the level
/// below it does.
///
/// - `None` - auditing disabled, no records are emitted
/// - `Metadata` - identity, method, URI, timing, headers, status code
/// - `Request` - metadata plus the (redacted) request body
/// - `RequestResponse` - request plus the (redacted) response body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditLevel {
    /// No records are emitted.
    None,
    /// Record metadata only.
    #[default]
    Metadata,
    /// Metadata plus request body.
    Request,
    /// Metadata plus request and response bodies.
    RequestResponse,
}

impl AuditLevel {
    /// Level name as used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditLevel::None => "none",
            AuditLevel::Metadata => "metadata",
            AuditLevel::Request => "request",
            AuditLevel::RequestResponse => "requestresponse",
        }
    }
}

impl fmt::Display for AuditLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown level name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(String);

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown audit level: {}", self.0)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for AuditLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "off" => Ok(AuditLevel::None),
            "metadata" => Ok(AuditLevel::Metadata),
            "request" => Ok(AuditLevel::Request),
            "requestresponse" | "request-response" => Ok(AuditLevel::RequestResponse),
            other => Err(ParseLevelError(other.to_string())),
        }
    }
}
