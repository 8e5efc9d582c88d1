//! Request identifiers and the generators that produce them.

mod generator;
mod request_id;

pub use generator::{
    AlphaTimestampGenerator, DEFAULT_ALPHA_LEN, GenerateRequestId, GeneratorKind,
    SharedGenerator, UuidGenerator,
};
pub use request_id::RequestId;
