//! Request-scoped logger middleware.

use std::fmt;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::http::Request;
use tower::{Layer, Service};

use crate::context::RequestContext;
use crate::logger::{ContextLogger, LogSink};
use crate::tracing_targets::TRACING_TARGET_REQUEST_LOGGER;

/// [`Layer`] that installs a [`ContextLogger`] into the request context.
///
/// Lines are prefixed with the identifier already bound in the context, so
/// this layer belongs inside [`RequestIdLayer`]. Used on its own it installs
/// an unprefixed logger.
///
/// [`RequestIdLayer`]: super::RequestIdLayer
#[derive(Clone)]
pub struct RequestLoggerLayer {
    sink: Arc<dyn LogSink>,
}

impl RequestLoggerLayer {
    /// Creates a new layer writing to `sink`.
    pub fn new(sink: impl LogSink) -> Self {
        Self {
            sink: Arc::new(sink),
        }
    }

    /// Creates a new layer writing to an already shared sink.
    pub fn from_shared(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }
}

impl fmt::Debug for RequestLoggerLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestLoggerLayer").finish_non_exhaustive()
    }
}

impl<S> Layer<S> for RequestLoggerLayer {
    type Service = RequestLoggerService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLoggerService {
            inner,
            sink: self.sink.clone(),
        }
    }
}

/// Middleware produced by [`RequestLoggerLayer`].
#[derive(Clone)]
pub struct RequestLoggerService<S> {
    inner: S,
    sink: Arc<dyn LogSink>,
}

impl<S: fmt::Debug> fmt::Debug for RequestLoggerService<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestLoggerService")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<S, ReqBody> Service<Request<ReqBody>> for RequestLoggerService<S>
where
    S: Service<Request<ReqBody>>,
{
    type Error = S::Error;
    type Future = S::Future;
    type Response = S::Response;

    #[inline]
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<ReqBody>) -> Self::Future {
        let context = RequestContext::from_extensions(request.extensions());
        let logger = ContextLogger::for_request(self.sink.clone(), context.request_id());

        tracing::trace!(
            target: TRACING_TARGET_REQUEST_LOGGER,
            prefix = logger.prefix(),
            "request logger installed"
        );

        context
            .with_logger(logger)
            .insert_into(request.extensions_mut());

        self.inner.call(request)
    }
}
