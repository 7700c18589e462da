//! Status middleware translating structured errors to and from gRPC statuses
//!
//! Servers wrap their handlers in [`StatusLayer::server`] so failures leave
//! the process as statuses with a canonical `google.rpc.ErrorInfo`
//! attachment. Clients wrap their calls in [`StatusLayer::client`] so those
//! statuses turn back into [`ferry_core::Error`] values.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod decode;
mod encode;
mod handler;
mod layer;

pub use decode::{decode, decode_error};
pub use encode::{encode, encode_error};
pub use handler::{ErrorHandler, HandlerFn, Options, Role};
pub use layer::{StatusLayer, StatusService};
