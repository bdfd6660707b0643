//! Error types for the audit pipeline

use thiserror::Error;

/// Errors produced while capturing, assembling, or writing an audit record.
///
/// Every failure is local to a single session: one failing session never
/// affects another, and nothing is retried here.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Reading the request body stream failed. The session is not created
    /// and no record is attempted for that request.
    #[error("failed to read request body: {0}")]
    BodyRead(std::io::Error),

    /// Serializing the record's fixed fields (or re-encoding a redacted
    /// body) failed. The record is not emitted.
    #[error("failed to serialize audit record: {0}")]
    Serialize(serde_json::Error),

    /// The assembled record did not survive the compaction pass, meaning an
    /// embedded body fragment was not valid JSON. Nothing is written to the
    /// sink.
    #[error("compact audit record json failed: {0}")]
    InvalidRecord(serde_json::Error),

    /// The output sink rejected the write.
    #[error("failed to write audit record to sink: {0}")]
    Sink(std::io::Error),
}

pub type Result<T> = std::result::Result<T, AuditError>;
