//! HTTP request/response audit logging
//!
//! This crate sits on the request path of an API server and emits one
//! compact JSON record per request, with sensitive material redacted before
//! anything reaches the sink.
//!
//! # Features
//!
//! - **Audit Sessions** - One per-request handle from arrival to completion
//! - **Body Interception** - Buffers request bodies and restores the stream
//!   so the downstream handler is unaffected
//! - **Redaction** - Recursive sensitive-key masking plus wholesale Secret
//!   payload redaction
//! - **Header Filtering** - Deny-list removal of credential headers
//! - **Verbosity Levels** - `None` through `RequestResponse` capture control
//! - **Pluggable Sinks** - File, stdout, and in-memory destinations
//!
//! # Quick Start
//!
//! ```no_run
//! use http_audit::*;
//!
//! # async fn example() -> http_audit::Result<()> {
//! let audit = AuditLogger::builder()
//!     .level(AuditLevel::RequestResponse)
//!     .sink(FileSink::new("audit.log"))
//!     .build();
//!
//! let mut request = AuditRequest::new("POST", "/v3/users")
//!     .with_header("Content-Type", "application/json")
//!     .with_body(r#"{"name":"alice","password":"secret123"}"#);
//!
//! let session = audit.begin(&mut request).await?;
//! // ...the application handles the request...
//! let response = AuditResponse::new(201)
//!     .with_header("Content-Type", "application/json")
//!     .with_body(r#"{"id":"u-1","name":"alice"}"#);
//! session.finish(None, &response).await?;
//! # Ok(())
//! # }
//! ```

pub mod body;
pub mod config;
pub mod error;
pub mod headers;
pub mod http;
pub mod level;
pub mod logger;
pub mod record;
pub mod redact;
pub mod session;
pub mod sink;

pub use body::*;
pub use config::*;
pub use error::*;
pub use headers::*;
pub use http::*;
pub use level::*;
pub use logger::*;
pub use record::*;
pub use redact::*;
pub use session::*;
pub use sink::*;
