//! Request-scoped logger that prefixes lines with the request identifier.

use std::fmt;
use std::sync::Arc;

use super::LogSink;
use crate::id::RequestId;
use crate::tracing_targets::TRACING_TARGET_LOGGER;

/// Logger bound to a single request.
///
/// Every call writes exactly one line to the sink: the prefix followed by the
/// message. With an identifier the prefix is `[<id>] `; without one the line
/// is written as-is. Write failures are reported through `tracing` and never
/// reach the caller.
#[derive(Clone)]
pub struct ContextLogger {
    sink: Arc<dyn LogSink>,
    prefix: Arc<str>,
}

impl ContextLogger {
    /// Creates an unprefixed logger.
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            prefix: Arc::from(""),
        }
    }

    /// Creates a logger prefixed with `request_id`, if any.
    pub fn for_request(sink: Arc<dyn LogSink>, request_id: Option<&RequestId>) -> Self {
        match request_id {
            Some(id) => Self {
                sink,
                prefix: Arc::from(format!("[{id}] ")),
            },
            None => Self::new(sink),
        }
    }

    /// Returns the prefix written before every message.
    #[inline]
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Writes a single line.
    pub fn log(&self, message: impl fmt::Display) {
        let line = format!("{}{message}", self.prefix);
        if let Err(err) = self.sink.write_line(&line) {
            tracing::warn!(
                target: TRACING_TARGET_LOGGER,
                error = %err,
                "failed to write request log line"
            );
        }
    }

    /// Writes a single line. Same as [`log`](Self::log), the level is not recorded in the line.
    #[inline]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(message);
    }

    /// Writes a single line. Same as [`log`](Self::log), the level is not recorded in the line.
    #[inline]
    pub fn info(&self, message: impl fmt::Display) {
        self.log(message);
    }

    /// Writes a single line. Same as [`log`](Self::log), the level is not recorded in the line.
    #[inline]
    pub fn warn(&self, message: impl fmt::Display) {
        self.log(message);
    }

    /// Writes a single line. Same as [`log`](Self::log), the level is not recorded in the line.
    #[inline]
    pub fn error(&self, message: impl fmt::Display) {
        self.log(message);
    }
}

impl fmt::Debug for ContextLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextLogger")
            .field("prefix", &self.prefix())
            .finish_non_exhaustive()
    }
}
