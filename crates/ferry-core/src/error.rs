use std::error::Error as StdError;

use prost_types::Any;
use tonic::{Code, Status};

use crate::detail::{self, Attachment, ErrorInfo, MESSAGE_KEY};

/// Boxed error as it flows through middleware
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Reason given to errors that carry no machine-readable reason of their own
pub const UNKNOWN_REASON: &str = "UNKNOWN";

/// Code value meaning "not set yet"
const UNSET_CODE: i32 = 0;

/// Trait for domain errors that can be lifted into a structured [`Error`]
///
/// Implemented by each service's error enum. Domain errors stay free of
/// transport types while the status middleware still carries an exact
/// code and reason across the wire.
pub trait StructuredError: StdError {
    /// gRPC code for this error
    fn status_code(&self) -> Code;

    /// Machine-readable reason (e.g. `WIDGET_NOT_FOUND`)
    fn reason(&self) -> &str;

    /// Message safe to expose to callers
    fn client_message(&self) -> String;
}

/// Application-level structured error
///
/// Carries a gRPC code, a short reason token callers can branch on, a
/// human-readable message, and any typed details to relay.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("error: code = {code} reason = {reason} message = {message}")]
pub struct Error {
    /// gRPC code value; `0` means unset
    pub code: i32,
    /// Machine-readable error class
    pub reason: String,
    /// Human-readable description
    pub message: String,
    /// Typed payloads relayed alongside the error
    pub details: Vec<Any>,
}

impl Error {
    /// Create an error with the given code, reason and message
    pub fn new(code: Code, reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            reason: reason.into(),
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn invalid_argument(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Code::InvalidArgument, reason, message)
    }

    pub fn not_found(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Code::NotFound, reason, message)
    }

    pub fn already_exists(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Code::AlreadyExists, reason, message)
    }

    pub fn permission_denied(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Code::PermissionDenied, reason, message)
    }

    pub fn unauthenticated(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Code::Unauthenticated, reason, message)
    }

    pub fn unavailable(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Code::Unavailable, reason, message)
    }

    pub fn internal(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Code::Internal, reason, message)
    }

    /// Lift a domain error into a structured error
    pub fn from_structured<E: StructuredError + ?Sized>(err: &E) -> Self {
        Self::new(err.status_code(), err.reason(), err.client_message())
    }

    /// Baseline error for a status, using its code and raw message
    ///
    /// The reason is [`UNKNOWN_REASON`] and no details are carried; reading
    /// the status's attachments is the decoder's job.
    pub fn from_status(status: &Status) -> Self {
        Self {
            code: status.code() as i32,
            reason: UNKNOWN_REASON.to_owned(),
            message: status.message().to_owned(),
            details: Vec::new(),
        }
    }

    /// Error for a status returned by a further upstream call
    ///
    /// Reason and message come from the first `google.rpc.ErrorInfo`
    /// attachment. Every other attachment stays in `details` in order, so
    /// encoding the error again relays it. Statuses whose details are not a
    /// `google.rpc.Status` fall back to [`Error::from_status`].
    pub fn from_upstream(status: &Status) -> Self {
        let mut error = Self::from_status(status);

        let Ok(mut details) = detail::decode_details(status.details()) else {
            return error;
        };

        let canonical = details.iter().enumerate().find_map(|(index, any)| {
            match Attachment::try_from(any.clone()) {
                Ok(Attachment::ErrorInfo(info)) => Some((index, info)),
                _ => None,
            }
        });

        if let Some((index, ErrorInfo { reason, mut metadata, .. })) = canonical {
            details.remove(index);
            error.reason = reason;
            error.message = metadata.remove(MESSAGE_KEY).unwrap_or_default();
        }

        error.details = details;
        error
    }

    /// Recover a structured error from an opaque one
    ///
    /// Structured errors come back as they are, statuses go through
    /// [`Error::from_upstream`], anything else keeps its display text as the
    /// message and leaves the code unset.
    pub fn from_error(err: BoxError) -> Self {
        match err.downcast::<Self>() {
            Ok(error) => *error,
            Err(err) => match err.downcast::<Status>() {
                Ok(status) => Self::from_upstream(&status),
                Err(err) => Self {
                    code: UNSET_CODE,
                    reason: UNKNOWN_REASON.to_owned(),
                    message: err.to_string(),
                    details: Vec::new(),
                },
            },
        }
    }

    /// Append a detail payload
    #[must_use]
    pub fn with_detail(mut self, detail: Any) -> Self {
        self.details.push(detail);
        self
    }

    /// Append several detail payloads, keeping their order
    #[must_use]
    pub fn with_details(mut self, details: impl IntoIterator<Item = Any>) -> Self {
        self.details.extend(details);
        self
    }

    /// gRPC code; an unset code reports as [`Code::Unknown`]
    ///
    /// Values outside the gRPC code range report as [`Code::Unknown`] too,
    /// so they also go out on the wire as Unknown.
    pub fn code(&self) -> Code {
        match self.code {
            UNSET_CODE => Code::Unknown,
            code => Code::from(code),
        }
    }

    /// Whether both errors share a code and reason
    pub fn is(&self, other: &Self) -> bool {
        self.code == other.code && self.reason == other.reason
    }

    /// Surface as a status with this error's own details attached
    ///
    /// The status text is the bare message; use the status encoder for the
    /// canonical wire form with an error-info attachment.
    pub fn to_status(&self) -> Status {
        if self.details.is_empty() {
            return Status::new(self.code(), self.message.clone());
        }

        let details = detail::encode_details(self.code() as i32, &self.message, self.details.clone());
        Status::with_details(self.code(), self.message.clone(), details)
    }
}

/// Reason of a structured error, or [`UNKNOWN_REASON`] for anything else
pub fn reason<'a>(err: &'a (dyn StdError + 'static)) -> &'a str {
    err.downcast_ref::<Error>()
        .map_or(UNKNOWN_REASON, |error| error.reason.as_str())
}

/// gRPC code of a structured error or status, or [`Code::Unknown`] for anything else
pub fn code(err: &(dyn StdError + 'static)) -> Code {
    if let Some(error) = err.downcast_ref::<Error>() {
        return error.code();
    }

    err.downcast_ref::<Status>().map_or(Code::Unknown, Status::code)
}
