use ferry_config::{HandlerKind, StatusConfig};
use ferry_core::BoxError;

use crate::{decode_error, encode_error};

/// Signature of a custom error handler
pub type HandlerFn = fn(BoxError) -> BoxError;

/// What the status layer does with an error returned by the inner service
#[derive(Debug, Clone, Copy)]
pub enum ErrorHandler {
    /// Encode into a wire status ([`encode_error`])
    Encode,
    /// Decode a wire status into a structured error ([`decode_error`])
    Decode,
    /// Hand the error back untouched
    Passthrough,
    /// Caller-supplied handler
    Custom(HandlerFn),
}

impl ErrorHandler {
    /// Apply the handler to an error
    pub fn handle(self, err: BoxError) -> BoxError {
        match self {
            Self::Encode => encode_error(err),
            Self::Decode => decode_error(err),
            Self::Passthrough => err,
            Self::Custom(handler) => handler(err),
        }
    }
}

impl From<HandlerKind> for ErrorHandler {
    fn from(kind: HandlerKind) -> Self {
        match kind {
            HandlerKind::Encode => Self::Encode,
            HandlerKind::Decode => Self::Decode,
            HandlerKind::Passthrough => Self::Passthrough,
        }
    }
}

/// Side of a call the status layer sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Wraps request handlers; errors leave the process as statuses
    Server,
    /// Wraps outgoing calls; statuses come back as structured errors
    Client,
}

impl Role {
    /// Handler used when none is configured: encode for servers, decode for clients
    pub const fn default_handler(self) -> ErrorHandler {
        match self {
            Self::Server => ErrorHandler::Encode,
            Self::Client => ErrorHandler::Decode,
        }
    }
}

/// Status layer options
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// Handler applied to every error from the inner service
    pub handler: ErrorHandler,
}

impl Options {
    /// Defaults for the given role
    pub const fn for_role(role: Role) -> Self {
        Self {
            handler: role.default_handler(),
        }
    }

    /// Server defaults: errors are encoded
    pub const fn server() -> Self {
        Self::for_role(Role::Server)
    }

    /// Client defaults: errors are decoded
    pub const fn client() -> Self {
        Self::for_role(Role::Client)
    }

    /// Replace the handler
    #[must_use]
    pub const fn with_handler(mut self, handler: ErrorHandler) -> Self {
        self.handler = handler;
        self
    }

    /// Options for a role as set in the status section of the config file
    ///
    /// A role without an explicit handler keeps its default.
    pub fn from_config(role: Role, config: &StatusConfig) -> Self {
        let role_config = match role {
            Role::Server => &config.server,
            Role::Client => &config.client,
        };

        role_config
            .handler
            .map_or_else(|| Self::for_role(role), |kind| Self { handler: kind.into() })
    }
}
