//! Request identifier resolution and propagation middleware.

use std::future::ready;
use std::task::{Context, Poll};

use axum::http::{Request, Response, StatusCode};
use futures::future::{BoxFuture, FutureExt};
use tower::{Layer, Service};
use tracing::Instrument;

use super::config::{IdSource, RequestIdConfig};
use crate::context::RequestContext;
use crate::tracing_targets::TRACING_TARGET_REQUEST_ID;

/// [`Layer`] that assigns every request an identifier.
///
/// The identifier is taken from the request context if one is already bound,
/// otherwise from the configured request header, otherwise from the
/// generator. It is stored in the [`RequestContext`] and, if configured,
/// written to the response header. When generation fails the request is
/// answered with `500 Internal Server Error` and the inner service is never
/// called.
#[derive(Debug, Clone, Default)]
pub struct RequestIdLayer {
    config: RequestIdConfig,
}

impl RequestIdLayer {
    /// Creates a new layer with the given configuration.
    pub fn new(config: RequestIdConfig) -> Self {
        Self { config }
    }
}

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService {
            inner,
            config: self.config.clone(),
        }
    }
}

/// Middleware produced by [`RequestIdLayer`].
#[derive(Debug, Clone)]
pub struct RequestIdService<S> {
    inner: S,
    config: RequestIdConfig,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestIdService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send,
    ReqBody: Send + 'static,
    ResBody: Default + Send + 'static,
{
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = Response<ResBody>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<ReqBody>) -> Self::Future {
        let context = RequestContext::from_extensions(request.extensions());

        let (request_id, source) = match self.config.resolve(&context, request.headers()) {
            Ok(resolved) => resolved,
            Err(err) => {
                tracing::error!(
                    target: TRACING_TARGET_REQUEST_ID,
                    error = %err,
                    method = %request.method(),
                    uri = %request.uri(),
                    "failed to generate request identifier"
                );

                return ready(Ok(internal_server_error())).boxed();
            }
        };

        tracing::debug!(
            target: TRACING_TARGET_REQUEST_ID,
            request_id = %request_id,
            source = %source,
            "request identifier resolved"
        );

        if source != IdSource::Context {
            context
                .with_request_id(request_id.clone())
                .insert_into(request.extensions_mut());
        }

        let response_header = self.config.response_header().and_then(|name| {
            let Some(value) = request_id.to_header_value() else {
                tracing::warn!(
                    target: TRACING_TARGET_REQUEST_ID,
                    request_id = %request_id,
                    header = %name,
                    "request identifier is not a valid header value, skipping response header"
                );
                return None;
            };

            Some((name.clone(), value))
        });

        let span = tracing::info_span!(
            target: TRACING_TARGET_REQUEST_ID,
            "request",
            request_id = %request_id
        );

        // The clone may not be ready; keep the instance `poll_ready` was called on.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        async move {
            let mut response = inner.call(request).await?;

            // A value written by an inner handler takes precedence.
            if let Some((name, value)) = response_header {
                response.headers_mut().entry(name).or_insert(value);
            }

            Ok(response)
        }
        .instrument(span)
        .boxed()
    }
}

fn internal_server_error<B: Default>() -> Response<B> {
    let mut response = Response::new(B::default());
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}
