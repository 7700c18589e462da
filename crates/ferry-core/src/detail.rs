//! Typed detail attachments carried in a status's details
//!
//! Details travel as a protobuf `google.rpc.Status` whose `details` field
//! holds `google.protobuf.Any` envelopes. `google.rpc.ErrorInfo` is the only
//! attachment interpreted here; every other type is relayed as-is.

use std::collections::HashMap;

use bytes::Bytes;
use prost::Message;
use prost_types::Any;
use thiserror::Error;

/// Fully-qualified protobuf name of the canonical error-info attachment
pub const ERROR_INFO_NAME: &str = "google.rpc.ErrorInfo";

/// Type URL used when packing an [`ErrorInfo`]
pub const ERROR_INFO_TYPE_URL: &str = "type.googleapis.com/google.rpc.ErrorInfo";

/// Metadata key holding the human-readable message
pub const MESSAGE_KEY: &str = "message";

/// `google.rpc.ErrorInfo`
#[derive(Clone, PartialEq, Message)]
pub struct ErrorInfo {
    /// Machine-readable error class
    #[prost(string, tag = "1")]
    pub reason: String,
    /// Logical grouping the reason belongs to
    #[prost(string, tag = "2")]
    pub domain: String,
    /// Additional structured context
    #[prost(map = "string, string", tag = "3")]
    pub metadata: HashMap<String, String>,
}

/// `google.rpc.Status`, the envelope tonic places in `grpc-status-details-bin`
#[derive(Clone, PartialEq, Message)]
pub struct RpcStatus {
    /// gRPC code value
    #[prost(int32, tag = "1")]
    pub code: i32,
    /// Status text
    #[prost(string, tag = "2")]
    pub message: String,
    /// Packed attachments, canonical error info first
    #[prost(message, repeated, tag = "3")]
    pub details: Vec<Any>,
}

/// Failure to turn an opaque `Any` into an [`Attachment`]
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Type URL does not name a message
    #[error("invalid attachment type url: `{0}`")]
    InvalidTypeUrl(String),

    /// Payload does not decode as the type its URL names
    #[error("failed to decode attachment `{type_url}`: {source}")]
    Decode {
        /// Type URL of the offending attachment
        type_url: String,
        #[source]
        source: prost::DecodeError,
    },
}

/// A detail attachment, either the canonical error info or anything else
#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    /// Canonical `google.rpc.ErrorInfo`
    ErrorInfo(ErrorInfo),
    /// Any other message, kept in its packed form
    Other(Any),
}

impl Attachment {
    /// Build the canonical error info carrying `reason` and the `message` metadata entry
    pub fn error_info(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ErrorInfo(ErrorInfo {
            reason: reason.into(),
            domain: String::new(),
            metadata: HashMap::from([(MESSAGE_KEY.to_owned(), message.into())]),
        })
    }

    /// Pack back into an `Any`
    ///
    /// `Other` attachments come back byte-for-byte as they went in.
    pub fn into_any(self) -> Any {
        match self {
            Self::ErrorInfo(info) => Any {
                type_url: ERROR_INFO_TYPE_URL.to_owned(),
                value: info.encode_to_vec(),
            },
            Self::Other(any) => any,
        }
    }
}

impl TryFrom<Any> for Attachment {
    type Error = ConversionError;

    fn try_from(any: Any) -> Result<Self, Self::Error> {
        let is_error_info = match message_name(&any.type_url) {
            Some(name) => name == ERROR_INFO_NAME,
            None => return Err(ConversionError::InvalidTypeUrl(any.type_url.clone())),
        };

        if !is_error_info {
            return Ok(Self::Other(any));
        }

        ErrorInfo::decode(any.value.as_slice())
            .map(Self::ErrorInfo)
            .map_err(|source| ConversionError::Decode {
                type_url: any.type_url,
                source,
            })
    }
}

/// Message name a type URL points at: everything after the last `/`
fn message_name(type_url: &str) -> Option<&str> {
    let (_, name) = type_url.rsplit_once('/')?;
    (!name.is_empty()).then_some(name)
}

/// Serialize attachments into the bytes tonic carries as status details
pub fn encode_details(code: i32, message: &str, details: Vec<Any>) -> Bytes {
    let envelope = RpcStatus {
        code,
        message: message.to_owned(),
        details,
    };

    Bytes::from(envelope.encode_to_vec())
}

/// Read the attachment list back out of status details bytes
///
/// Empty input decodes to an empty list.
///
/// # Errors
///
/// Returns an error if the bytes are not a `google.rpc.Status` message
pub fn decode_details(bytes: &[u8]) -> Result<Vec<Any>, prost::DecodeError> {
    RpcStatus::decode(bytes).map(|envelope| envelope.details)
}
