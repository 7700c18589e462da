use ferry_core::detail::{self, MESSAGE_KEY};
use ferry_core::{Attachment, BoxError, Error, ErrorInfo};
use tonic::Status;

/// Decode a status received from a peer into a structured error
///
/// Starts from [`Error::from_status`] and takes reason and message from the
/// first `google.rpc.ErrorInfo` attachment, if any. Later attachments and
/// attachments of other types are ignored and not carried over. The status
/// text is never parsed.
pub fn decode(status: &Status) -> Error {
    let mut error = Error::from_status(status);

    let details = match detail::decode_details(status.details()) {
        Ok(details) => details,
        Err(e) => {
            tracing::debug!(code = ?status.code(), error = %e, "status details are not a google.rpc.Status");
            return error;
        }
    };

    for any in details {
        if let Ok(Attachment::ErrorInfo(ErrorInfo { reason, mut metadata, .. })) = Attachment::try_from(any) {
            error.reason = reason;
            error.message = metadata.remove(MESSAGE_KEY).unwrap_or_default();

            tracing::debug!(code = error.code, reason = %error.reason, "decoded status into error");
            return error;
        }
    }

    error
}

/// Client-side error handler: turn a received status back into a structured error
///
/// Errors that are not statuses are first converted with tonic's best-effort
/// [`Status::from_error`]. Errors that are already structured pass through
/// untouched.
pub fn decode_error(err: BoxError) -> BoxError {
    let status = match err.downcast::<Error>() {
        Ok(error) => return error,
        Err(err) => Status::from_error(err),
    };

    Box::new(decode(&status))
}
