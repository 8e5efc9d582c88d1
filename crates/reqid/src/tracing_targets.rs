//! Centralized tracing target constants for structured logging.
//!
//! Using consistent targets enables fine-grained control over log output
//! via tracing subscriber filters, e.g. `RUST_LOG=reqid::middleware=debug`.

/// Identifier resolution and response header propagation.
pub const TRACING_TARGET_REQUEST_ID: &str = "reqid::middleware::request_id";

/// Installation of request-scoped loggers.
pub const TRACING_TARGET_REQUEST_LOGGER: &str = "reqid::middleware::logger";

/// Identifier generation.
pub const TRACING_TARGET_GENERATOR: &str = "reqid::generator";

/// Log sink failures and forwarded request log lines.
pub const TRACING_TARGET_LOGGER: &str = "reqid::logger";

/// Extractor rejections.
pub const TRACING_TARGET_EXTRACT: &str = "reqid::extract";
