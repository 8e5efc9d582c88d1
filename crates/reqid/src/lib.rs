#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod context;
mod error;
mod id;

pub mod extract;
pub mod logger;
pub mod middleware;
pub mod tracing_targets;

pub use crate::context::RequestContext;
pub use crate::error::{BoxedError, Error, ErrorKind, Result};
pub use crate::id::{
    AlphaTimestampGenerator, DEFAULT_ALPHA_LEN, GenerateRequestId, GeneratorKind, RequestId,
    SharedGenerator, UuidGenerator,
};
pub use crate::logger::{ContextLogger, LogSink, MemorySink, TracingSink, WriterSink};
