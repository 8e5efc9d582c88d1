//! Middleware for `axum::Router` and any other `tower` service stack.
//!
//! - [`RequestIdLayer`] resolves the identifier for every request, stores it
//!   in the [`RequestContext`] and mirrors it into a response header.
//! - [`RequestLoggerLayer`] binds a [`ContextLogger`] prefixed with that
//!   identifier.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use axum::Router;
//! use axum::routing::get;
//! use reqid::middleware::{RequestIdConfig, RouterRequestIdExt};
//! use reqid::WriterSink;
//!
//! let app: Router = Router::new()
//!     .route("/", get(|| async { "ok" }))
//!     .with_request_tracking(RequestIdConfig::default(), Arc::new(WriterSink::stdout()));
//! ```
//!
//! [`RequestContext`]: crate::RequestContext
//! [`ContextLogger`]: crate::ContextLogger

mod config;
mod extensions;
mod logger;
mod request_id;

pub use config::{DEFAULT_HEADER, IdSource, RequestIdConfig, RequestIdSettings};
pub use extensions::RouterRequestIdExt;
pub use logger::{RequestLoggerLayer, RequestLoggerService};
pub use request_id::{RequestIdLayer, RequestIdService};
