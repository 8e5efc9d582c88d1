//! Demo routes and middleware stack.

use std::sync::Arc;

use axum::Router;
use axum::http::{Method, Uri};
use axum::routing::get;
use reqid::middleware::{RequestIdConfig, RouterRequestIdExt};
use reqid::{ContextLogger, LogSink, RequestId};
use tower_http::trace::TraceLayer;

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Request identifier resolution (outermost)
/// 2. Request logger
/// 3. HTTP tracing, inside the span carrying the identifier
/// 4. Routes (innermost)
pub fn router(config: RequestIdConfig, sink: Arc<dyn LogSink>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_request_tracking(config, sink)
}

/// Logs through the request logger and echoes the identifier.
async fn index(method: Method, uri: Uri, id: RequestId, logger: ContextLogger) -> String {
    logger.info(format_args!("handled {method} {}", uri.path()));
    id.to_string()
}

async fn health() -> &'static str {
    "ok"
}
