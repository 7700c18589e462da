//! Structured application errors and the detail attachments that carry them
//! across a gRPC boundary

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod detail;
mod error;

pub use detail::{Attachment, ConversionError, ErrorInfo, RpcStatus};
pub use error::{BoxError, Error, StructuredError, UNKNOWN_REASON, code, reason};
