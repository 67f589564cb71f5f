//! Turning arbitrary errors into messages that are safe to show users

use std::error::Error as StdError;

use crate::error::Error;

/// Message shown when an error carries nothing fit for end users
pub const DEFAULT_FALLBACK_MESSAGE: &str = "Something went wrong";

/// Errors that may carry a message safe to display to end users
pub trait PublicMessage: StdError {
    /// The displayable message, if this error has one
    fn public_message(&self) -> Option<&str>;
}

impl PublicMessage for Error {
    fn public_message(&self) -> Option<&str> {
        match self {
            Self::PublicMessage(message) => Some(message),
            _ => None,
        }
    }
}

/// Return the public message carried by `error` or by the first
/// [`Error`] in its source chain, or log the error and return `fallback`.
pub fn public_message_from_error<E>(error: &E, fallback: &str) -> String
where
    E: PublicMessage + ?Sized,
{
    if let Some(message) = error.public_message() {
        return message.to_string();
    }

    let mut causes = Vec::new();
    let mut source = error.source();
    while let Some(cause) = source {
        if let Some(message) = cause
            .downcast_ref::<Error>()
            .and_then(PublicMessage::public_message)
        {
            return message.to_string();
        }
        causes.push(cause.to_string());
        source = cause.source();
    }
    tracing::error!(error = %error, ?causes, "unhandled error");

    fallback.to_string()
}
