//! Axum extractors for values bound in the [`RequestContext`].
//!
//! [`RequestContext`] itself never fails to extract; an empty context is
//! returned when no middleware ran. [`RequestId`] and [`ContextLogger`] are
//! only present when the matching middleware is installed, so extracting
//! them without it is a server misconfiguration and is rejected with
//! `500 Internal Server Error`.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};

use crate::context::RequestContext;
use crate::id::RequestId;
use crate::logger::ContextLogger;
use crate::tracing_targets::TRACING_TARGET_EXTRACT;

/// Rejection returned when a context value is not bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MissingContextValue {
    /// No [`RequestIdLayer`] ran for this request.
    ///
    /// [`RequestIdLayer`]: crate::middleware::RequestIdLayer
    #[error("request identifier is not bound to the request context")]
    RequestId,
    /// No [`RequestLoggerLayer`] ran for this request.
    ///
    /// [`RequestLoggerLayer`]: crate::middleware::RequestLoggerLayer
    #[error("request logger is not bound to the request context")]
    Logger,
}

impl IntoResponse for MissingContextValue {
    fn into_response(self) -> Response {
        tracing::error!(
            target: TRACING_TARGET_EXTRACT,
            error = %self,
            "missing request context value, is the middleware installed?"
        );

        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_extensions(&parts.extensions))
    }
}

impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = MissingContextValue;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        RequestContext::from_extensions(&parts.extensions)
            .request_id()
            .cloned()
            .ok_or(MissingContextValue::RequestId)
    }
}

impl<S> FromRequestParts<S> for ContextLogger
where
    S: Send + Sync,
{
    type Rejection = MissingContextValue;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        RequestContext::from_extensions(&parts.extensions)
            .logger()
            .cloned()
            .ok_or(MissingContextValue::Logger)
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::routing::get;
    use axum_test::TestServer;

    use super::*;
    use crate::middleware::{RequestIdConfig, RouterRequestIdExt};

    #[tokio::test]
    async fn context_extracts_without_middleware() -> anyhow::Result<()> {
        let router = Router::new().route(
            "/",
            get(|ctx: RequestContext| async move { ctx.is_empty().to_string() }),
        );
        let server = TestServer::new(router)?;

        let response = server.get("/").await;
        response.assert_status_ok();
        assert_eq!(response.text(), "true");

        Ok(())
    }

    #[tokio::test]
    async fn missing_request_id_is_rejected() -> anyhow::Result<()> {
        let router = Router::new().route("/", get(|id: RequestId| async move { id.to_string() }));
        let server = TestServer::new(router)?;

        let response = server.get("/").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        Ok(())
    }

    #[tokio::test]
    async fn missing_logger_is_rejected() -> anyhow::Result<()> {
        let router = Router::new()
            .route("/", get(|_logger: ContextLogger| async { "unreachable" }))
            .with_request_id(RequestIdConfig::default());
        let server = TestServer::new(router)?;

        let response = server.get("/").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().contains_key("request-id"));

        Ok(())
    }

    #[tokio::test]
    async fn request_id_extracts_after_middleware() -> anyhow::Result<()> {
        let config = RequestIdConfig::default().with_generator(|| RequestId::new("extracted"));
        let router = Router::new()
            .route("/", get(|id: RequestId| async move { id.to_string() }))
            .with_request_id(config);
        let server = TestServer::new(router)?;

        assert_eq!(server.get("/").await.text(), "extracted");

        Ok(())
    }
}
