//! Output sinks for completed audit lines

use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Append-only destination for finished records.
///
/// Each completed session makes exactly one `write` call carrying one
/// newline-terminated line. Sessions do not serialize access to the sink;
/// an implementation shared across tasks must keep concurrent appends from
/// interleaving within a line.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Append one complete record line, trailing newline included.
    async fn write(&self, line: &[u8]) -> io::Result<()>;

    /// Flush any buffered writes.
    async fn flush(&self) -> io::Result<()>;
}

/// File sink, one JSON object per line.
///
/// The file is opened in append mode for every write, so a single `write_all`
/// carries each whole line.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path the sink appends to.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl AuditSink for FileSink {
    async fn write(&self, line: &[u8]) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        file.write_all(line).await?;
        file.flush().await?;

        Ok(())
    }

    async fn flush(&self) -> io::Result<()> {
        // Every write opens, appends, and flushes on its own.
        Ok(())
    }
}

/// Stdout sink for development.
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditSink for StdoutSink {
    async fn write(&self, line: &[u8]) -> io::Result<()> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(line).await?;
        stdout.flush().await?;
        Ok(())
    }

    async fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Memory sink for testing.
///
/// Clones share the same line buffer, so a test can hand one clone to a
/// logger and inspect the other.
#[derive(Clone, Default)]
pub struct MemorySink {
    lines: Arc<tokio::sync::Mutex<Vec<Vec<u8>>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines written so far, as strings.
    pub async fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .await
            .iter()
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect()
    }

    /// All lines written so far, raw.
    pub async fn raw_lines(&self) -> Vec<Vec<u8>> {
        self.lines.lock().await.clone()
    }

    /// Drop everything written so far.
    pub async fn clear(&self) {
        self.lines.lock().await.clear();
    }
}

#[async_trait]
impl AuditSink for MemorySink {
    async fn write(&self, line: &[u8]) -> io::Result<()> {
        self.lines.lock().await.push(line.to_vec());
        Ok(())
    }

    async fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}
