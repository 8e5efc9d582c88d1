//! Pluggable request identifier generators.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "config")]
use clap::ValueEnum;
use rand::TryRngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use super::RequestId;
use crate::tracing_targets::TRACING_TARGET_GENERATOR;
use crate::{Error, Result};

/// Letters used by [`AlphaTimestampGenerator`].
const ALPHABET: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Random bytes at or above this value are discarded so that every letter is
/// equally likely (`208 = 4 * 52`).
const REJECTION_THRESHOLD: u8 = 208;

/// Default number of random letters in an [`AlphaTimestampGenerator`] id.
pub const DEFAULT_ALPHA_LEN: usize = 8;

/// Produces fresh request identifiers.
///
/// Implementations must be callable concurrently from many requests without
/// coordination. Collisions are a tolerated probabilistic risk.
///
/// Any `Fn() -> Result<RequestId>` closure is a generator, which keeps tests
/// deterministic:
///
/// ```
/// use reqid::{GenerateRequestId, RequestId};
///
/// let generator = || RequestId::new("fixed");
/// assert_eq!(generator.generate().unwrap().as_str(), "fixed");
/// ```
pub trait GenerateRequestId: Send + Sync + 'static {
    /// Generates a new identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Generation`] if no identifier could be produced.
    ///
    /// [`ErrorKind::Generation`]: crate::ErrorKind::Generation
    fn generate(&self) -> Result<RequestId>;
}

impl<F> GenerateRequestId for F
where
    F: Fn() -> Result<RequestId> + Send + Sync + 'static,
{
    #[inline]
    fn generate(&self) -> Result<RequestId> {
        self()
    }
}

/// Shared, type-erased generator handle.
#[derive(Clone)]
pub struct SharedGenerator(Arc<dyn GenerateRequestId>);

impl SharedGenerator {
    /// Wraps a generator so it can be shared between middleware clones.
    pub fn new(generator: impl GenerateRequestId) -> Self {
        Self(Arc::new(generator))
    }
}

impl GenerateRequestId for SharedGenerator {
    #[inline]
    fn generate(&self) -> Result<RequestId> {
        self.0.generate()
    }
}

impl Default for SharedGenerator {
    fn default() -> Self {
        Self::new(AlphaTimestampGenerator::default())
    }
}

impl fmt::Debug for SharedGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedGenerator").finish_non_exhaustive()
    }
}

/// Random letters followed by the hexadecimal Unix timestamp in seconds.
///
/// With the default length this yields ids like `qZbKxTrw6712c3a0`. The
/// letters come straight from the operating system's randomness source, so a
/// failing source surfaces as an error instead of a panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlphaTimestampGenerator {
    len: usize,
}

impl AlphaTimestampGenerator {
    /// Creates a generator producing `len` random letters before the timestamp.
    #[must_use]
    pub const fn new(len: usize) -> Self {
        Self { len }
    }

    fn random_letters(&self) -> Result<String> {
        let mut letters = String::with_capacity(self.len);
        let mut buf = [0u8; 32];

        while letters.len() < self.len {
            OsRng.try_fill_bytes(&mut buf).map_err(|err| {
                tracing::error!(
                    target: TRACING_TARGET_GENERATOR,
                    error = %err,
                    "operating system randomness source failed"
                );

                Error::generation("operating system randomness source failed").with_source(err)
            })?;

            letters.extend(
                buf.iter()
                    .filter(|byte| **byte < REJECTION_THRESHOLD)
                    .map(|byte| ALPHABET[usize::from(*byte) % ALPHABET.len()] as char)
                    .take(self.len - letters.len()),
            );
        }

        Ok(letters)
    }
}

impl Default for AlphaTimestampGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA_LEN)
    }
}

impl GenerateRequestId for AlphaTimestampGenerator {
    fn generate(&self) -> Result<RequestId> {
        let letters = self.random_letters()?;
        let seconds = jiff::Timestamp::now().as_second();
        RequestId::new(format!("{letters}{seconds:x}"))
    }
}

/// UUID-based generator for deployments that want stronger uniqueness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UuidGenerator {
    /// Random UUIDs.
    V4,
    /// Time-ordered UUIDs.
    V7,
}

impl GenerateRequestId for UuidGenerator {
    fn generate(&self) -> Result<RequestId> {
        let uuid = match self {
            Self::V4 => Uuid::new_v4(),
            Self::V7 => Uuid::now_v7(),
        };

        RequestId::new(uuid.hyphenated().to_string())
    }
}

/// Named generator choices exposed through configuration.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GeneratorKind {
    /// [`AlphaTimestampGenerator`] with the default length.
    #[default]
    AlphaTimestamp,
    /// [`UuidGenerator::V4`].
    UuidV4,
    /// [`UuidGenerator::V7`].
    UuidV7,
}

impl GeneratorKind {
    /// Builds the generator this kind names.
    pub fn into_generator(self) -> SharedGenerator {
        match self {
            Self::AlphaTimestamp => SharedGenerator::new(AlphaTimestampGenerator::default()),
            Self::UuidV4 => SharedGenerator::new(UuidGenerator::V4),
            Self::UuidV7 => SharedGenerator::new(UuidGenerator::V7),
        }
    }
}
