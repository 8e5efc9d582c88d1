//! The request identifier value type.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use axum::http::HeaderValue;
use derive_more::Display;

use crate::{Error, Result};

/// Opaque, non-empty identifier assigned to a single request.
///
/// Cloning is cheap: the underlying string is shared. The identifier is
/// never mutated once created.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub struct RequestId(Arc<str>);

impl RequestId {
    /// Creates a new identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidIdentifier`] if `value` is empty.
    ///
    /// [`ErrorKind::InvalidIdentifier`]: crate::ErrorKind::InvalidIdentifier
    pub fn new(value: impl AsRef<str>) -> Result<Self> {
        let value = value.as_ref();
        if value.is_empty() {
            return Err(Error::invalid_identifier("request identifier is empty"));
        }

        Ok(Self(Arc::from(value)))
    }

    /// Reads an identifier from a header value.
    ///
    /// Any non-empty value is adopted. The bytes are decoded as UTF-8, with
    /// invalid sequences replaced by `U+FFFD`. Returns `None` only for empty
    /// values.
    pub fn from_header_value(value: &HeaderValue) -> Option<Self> {
        Self::new(String::from_utf8_lossy(value.as_bytes())).ok()
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the identifier into a header value.
    ///
    /// Non-ASCII text is written as its UTF-8 bytes. Returns `None` if the
    /// identifier contains control characters, which are not allowed in a
    /// header value.
    #[must_use]
    pub fn to_header_value(&self) -> Option<HeaderValue> {
        HeaderValue::from_bytes(self.0.as_bytes()).ok()
    }
}

impl fmt::Debug for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RequestId").field(&self.as_str()).finish()
    }
}

impl AsRef<str> for RequestId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for RequestId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for RequestId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for RequestId {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}
