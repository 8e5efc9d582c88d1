//! Immutable request-scoped context.
//!
//! A [`RequestContext`] is a persistent chain of bindings. Adding a binding
//! returns a new context layered on the previous one; the parent is never
//! touched, so a context can be cloned and handed to concurrent work freely.
//!
//! The context travels with the request inside its [`Extensions`], which is
//! how the middlewares in this crate pass it down the chain.

use std::fmt;
use std::sync::Arc;

use axum::http::Extensions;

use crate::id::RequestId;
use crate::logger::ContextLogger;

#[derive(Debug)]
enum Binding {
    RequestId(RequestId),
    Logger(ContextLogger),
}

#[derive(Debug)]
struct Node {
    binding: Binding,
    parent: Option<Arc<Node>>,
}

/// Immutable per-request key-value carrier.
#[derive(Clone, Default)]
pub struct RequestContext {
    head: Option<Arc<Node>>,
}

impl RequestContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the context attached to `extensions`, or an empty one.
    #[must_use]
    pub fn from_extensions(extensions: &Extensions) -> Self {
        extensions.get::<Self>().cloned().unwrap_or_default()
    }

    /// Attaches this context to `extensions`, replacing any previous one.
    pub fn insert_into(self, extensions: &mut Extensions) {
        extensions.insert(self);
    }

    /// Returns a child context in which [`request_id`] resolves to `id`.
    ///
    /// [`request_id`]: Self::request_id
    #[must_use]
    pub fn with_request_id(&self, id: RequestId) -> Self {
        self.push(Binding::RequestId(id))
    }

    /// Returns the nearest request identifier binding.
    #[must_use]
    pub fn request_id(&self) -> Option<&RequestId> {
        self.nodes().find_map(|node| match &node.binding {
            Binding::RequestId(id) => Some(id),
            Binding::Logger(_) => None,
        })
    }

    /// Returns a child context in which [`logger`] resolves to `logger`.
    ///
    /// [`logger`]: Self::logger
    #[must_use]
    pub fn with_logger(&self, logger: ContextLogger) -> Self {
        self.push(Binding::Logger(logger))
    }

    /// Returns the nearest logger binding.
    #[must_use]
    pub fn logger(&self) -> Option<&ContextLogger> {
        self.nodes().find_map(|node| match &node.binding {
            Binding::Logger(logger) => Some(logger),
            Binding::RequestId(_) => None,
        })
    }

    /// Returns `true` if the context holds no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    fn push(&self, binding: Binding) -> Self {
        Self {
            head: Some(Arc::new(Node {
                binding,
                parent: self.head.clone(),
            })),
        }
    }

    fn nodes(&self) -> impl Iterator<Item = &Node> {
        std::iter::successors(self.head.as_deref(), |node| node.parent.as_deref())
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("request_id", &self.request_id())
            .field("logger", &self.logger())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::MemorySink;

    fn id(value: &str) -> RequestId {
        RequestId::new(value).unwrap()
    }

    #[test]
    fn empty_context_has_no_bindings() {
        let ctx = RequestContext::new();
        assert!(ctx.is_empty());
        assert!(ctx.request_id().is_none());
        assert!(ctx.logger().is_none());
    }

    #[test]
    fn child_sees_binding() {
        let ctx = RequestContext::new().with_request_id(id("test"));
        assert_eq!(ctx.request_id().unwrap().as_str(), "test");
    }

    #[test]
    fn child_overrides_without_mutating_parent() {
        let parent = RequestContext::new().with_request_id(id("parent"));
        let child = parent.with_request_id(id("child"));

        assert_eq!(parent.request_id().unwrap().as_str(), "parent");
        assert_eq!(child.request_id().unwrap().as_str(), "child");
    }

    #[test]
    fn child_inherits_other_bindings() {
        let sink = Arc::new(MemorySink::new());
        let parent = RequestContext::new().with_request_id(id("inherited"));
        let child = parent.with_logger(ContextLogger::new(sink));

        assert_eq!(child.request_id().unwrap().as_str(), "inherited");
        assert!(child.logger().is_some());
        assert!(parent.logger().is_none());
    }

    #[test]
    fn round_trips_through_extensions() {
        let mut extensions = Extensions::new();
        assert!(RequestContext::from_extensions(&extensions).is_empty());

        RequestContext::new()
            .with_request_id(id("stored"))
            .insert_into(&mut extensions);

        let ctx = RequestContext::from_extensions(&extensions);
        assert_eq!(ctx.request_id().unwrap().as_str(), "stored");
    }
}
