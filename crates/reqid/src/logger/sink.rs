//! Destinations for request log lines.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::tracing_targets::TRACING_TARGET_LOGGER;

/// Destination that accepts whole lines of text.
///
/// The line passed to [`write_line`] carries no trailing newline; sinks that
/// write to byte streams terminate each line themselves.
///
/// [`write_line`]: LogSink::write_line
pub trait LogSink: Send + Sync + 'static {
    /// Writes a single line.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the line could not be written.
    fn write_line(&self, line: &str) -> io::Result<()>;
}

impl<T> LogSink for Arc<T>
where
    T: LogSink + ?Sized,
{
    #[inline]
    fn write_line(&self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }
}

/// Sink over any [`io::Write`] destination.
///
/// Each line is written with a single `write_all` call while holding the
/// lock, so concurrent requests never interleave within a line.
pub struct WriterSink<W> {
    writer: Mutex<W>,
}

impl<W> WriterSink<W>
where
    W: Write + Send + 'static,
{
    /// Creates a new sink writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the sink, returning the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl WriterSink<io::Stdout> {
    /// Creates a sink writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl WriterSink<io::Stderr> {
    /// Creates a sink writing to standard error.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W> LogSink for WriterSink<W>
where
    W: Write + Send + 'static,
{
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))?;
        writer.write_all(buf.as_bytes())?;
        writer.flush()
    }
}

impl<W> fmt::Debug for WriterSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterSink").finish_non_exhaustive()
    }
}

/// In-memory sink, mostly useful in tests.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buf: Arc<Mutex<String>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns everything written so far, newline-terminated per line.
    pub fn contents(&self) -> String {
        match self.buf.lock() {
            Ok(buf) => buf.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut buf = self
            .buf
            .lock()
            .map_err(|_| io::Error::other("memory sink lock poisoned"))?;
        buf.push_str(line);
        buf.push('\n');
        Ok(())
    }
}

/// Sink forwarding each line to a `tracing` event at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        tracing::info!(target: TRACING_TARGET_LOGGER, "{line}");
        Ok(())
    }
}
