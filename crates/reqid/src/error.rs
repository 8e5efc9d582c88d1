//! Error types for identifier generation and middleware configuration.
//!
//! Only identifier generation can fail while a request is in flight; the
//! remaining kinds are raised while building configuration or constructing
//! identifiers from untrusted input.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

/// Type alias for boxed errors that are Send + Sync.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Result type alias for this crate's operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error kind enumeration for categorizing errors.
///
/// Separated from [`Error`] to allow pattern matching on the failure
/// category without inspecting the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The identifier generator could not produce a value.
    Generation,
    /// A candidate identifier was rejected (e.g. empty).
    InvalidIdentifier,
    /// Configuration values could not be turned into a working setup.
    Config,
}

impl ErrorKind {
    /// Returns the error kind as a string for categorization.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Generation => "generation",
            Self::InvalidIdentifier => "invalid_identifier",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error with a kind, a human-readable message and an optional source.
#[derive(Debug, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    #[source]
    source: Option<BoxedError>,
}

impl Error {
    /// Creates a new [`Error`].
    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attaches a source error to this error.
    #[inline]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error kind.
    #[must_use]
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[must_use]
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Creates a new generation error.
    #[inline]
    pub fn generation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Generation, message)
    }

    /// Creates a new invalid identifier error.
    #[inline]
    pub fn invalid_identifier(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidIdentifier, message)
    }

    /// Creates a new configuration error.
    #[inline]
    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Config, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_creation() {
        let error = Error::config("invalid header name");
        assert_eq!(error.kind(), ErrorKind::Config);
        assert_eq!(error.message(), "invalid header name");
        assert_eq!(error.to_string(), "config error: invalid header name");
    }

    #[test]
    fn error_with_source() {
        let source = std::io::Error::other("entropy unavailable");
        let error = Error::generation("randomness source failed").with_source(source);

        assert!(StdError::source(&error).is_some());
        assert_eq!(error.kind(), ErrorKind::Generation);
    }

    #[test]
    fn error_kind_as_str() {
        assert_eq!(ErrorKind::Generation.as_str(), "generation");
        assert_eq!(ErrorKind::InvalidIdentifier.as_str(), "invalid_identifier");
        assert_eq!(ErrorKind::Config.as_str(), "config");
    }
}
