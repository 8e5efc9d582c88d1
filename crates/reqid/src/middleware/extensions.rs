//! Router extension trait for request identifiers and request logging.

use std::sync::Arc;

use axum::Router;

use super::config::RequestIdConfig;
use super::logger::RequestLoggerLayer;
use super::request_id::RequestIdLayer;
use crate::logger::LogSink;

/// Extension trait for `axum::`[`Router`] to apply request tracking middleware.
///
/// Layers added through [`Router::layer`] wrap the routes registered before
/// the call, so apply these after all routes have been added.
pub trait RouterRequestIdExt<S> {
    /// Layers [`RequestIdLayer`] with the provided configuration.
    fn with_request_id(self, config: RequestIdConfig) -> Self;

    /// Layers [`RequestIdLayer`] with the default configuration.
    ///
    /// Trusts and emits the `Request-Id` header and generates missing
    /// identifiers with the alphanumeric timestamp generator.
    fn with_default_request_id(self) -> Self;

    /// Layers [`RequestLoggerLayer`] writing to `sink`.
    fn with_request_logger(self, sink: Arc<dyn LogSink>) -> Self;

    /// Layers both middlewares in the order that makes the logger see the
    /// resolved identifier.
    fn with_request_tracking(self, config: RequestIdConfig, sink: Arc<dyn LogSink>) -> Self;
}

impl<S> RouterRequestIdExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_request_id(self, config: RequestIdConfig) -> Self {
        self.layer(RequestIdLayer::new(config))
    }

    fn with_default_request_id(self) -> Self {
        self.with_request_id(RequestIdConfig::default())
    }

    fn with_request_logger(self, sink: Arc<dyn LogSink>) -> Self {
        self.layer(RequestLoggerLayer::from_shared(sink))
    }

    fn with_request_tracking(self, config: RequestIdConfig, sink: Arc<dyn LogSink>) -> Self {
        // The last layer added runs first.
        self.with_request_logger(sink).with_request_id(config)
    }
}
