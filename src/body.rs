//! Non-destructive request-body capture
//!
//! The audit pipeline must see the request body without consuming it: the
//! downstream handler has to observe exactly the bytes the client sent.
//! [`capture`] drains the one-shot body stream fully into memory, then puts
//! back a rewindable cursor over the same bytes in its place.

use crate::error::{AuditError, Result};
use crate::http::AuditRequest;
use bytes::Bytes;
use std::io::Cursor;
use tokio::io::AsyncReadExt;

/// Read the entire request body and restore it.
///
/// On success the request's body stream has been replaced with a fresh,
/// independently readable stream containing the identical bytes; the
/// returned [`Bytes`] are the audit pipeline's own copy. A request without a
/// body captures empty bytes and is left untouched.
///
/// On I/O failure the error is propagated as [`AuditError::BodyRead`] and the
/// stream is left drained; the caller decides whether to fail the request.
pub async fn capture(request: &mut AuditRequest) -> Result<Bytes> {
    let Some(mut stream) = request.body.take() else {
        return Ok(Bytes::new());
    };

    let mut buf = Vec::new();
    stream
        .read_to_end(&mut buf)
        .await
        .map_err(AuditError::BodyRead)?;

    let bytes = Bytes::from(buf);
    // Bytes clones share the buffer, so the rehydrated stream and the
    // captured copy cost one allocation between them.
    request.body = Some(Box::new(Cursor::new(bytes.clone())));

    Ok(bytes)
}
