//! Request-scoped logging.
//!
//! A [`LogSink`] is the only thing the logger needs from its destination:
//! the ability to write a line. [`ContextLogger`] decorates a sink with the
//! request identifier prefix.

mod context_logger;
mod sink;

pub use context_logger::ContextLogger;
pub use sink::{LogSink, MemorySink, TracingSink, WriterSink};
