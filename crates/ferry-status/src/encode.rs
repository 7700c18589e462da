use ferry_core::{Attachment, BoxError, ConversionError, Error, detail};
use tonic::Status;

/// Encode a structured error into the status sent over the wire
///
/// The status text is `"<reason>: <message>"`. Its details start with a
/// `google.rpc.ErrorInfo` carrying the reason and a `message` metadata
/// entry, followed by every detail already on the error in order.
///
/// # Errors
///
/// Returns the conversion error of the first detail that cannot be turned
/// into an attachment; no status is produced in that case.
pub fn encode(error: &Error) -> Result<Status, ConversionError> {
    // Unset codes go out as Unknown
    let code = error.code();
    let text = format!("{}: {}", error.reason, error.message);

    let mut details = Vec::with_capacity(error.details.len() + 1);
    details.push(Attachment::error_info(&error.reason, &error.message).into_any());

    for any in &error.details {
        let attachment = Attachment::try_from(any.clone()).inspect_err(|e| {
            tracing::warn!(reason = %error.reason, error = %e, "failed to convert error detail");
        })?;
        details.push(attachment.into_any());
    }

    tracing::debug!(code = ?code, reason = %error.reason, details = details.len(), "encoded error into status");

    let details = detail::encode_details(code as i32, &text, details);
    Ok(Status::with_details(code, text, details))
}

/// Server-side error handler: turn any error into an encoded status
///
/// Errors that are not already structured are recovered with
/// [`Error::from_error`] first. When encoding fails the conversion error
/// is returned in place of the status.
pub fn encode_error(err: BoxError) -> BoxError {
    let error = Error::from_error(err);

    match encode(&error) {
        Ok(status) => Box::new(status),
        Err(e) => Box::new(e),
    }
}
