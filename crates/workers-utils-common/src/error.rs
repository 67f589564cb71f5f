//! Error types shared by the API clients

use http::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::format::util_format;

#[derive(Debug, Error)]
pub enum Error {
    /// The caller should be sent somewhere else
    #[error("{message}")]
    Redirect {
        message: String,
        redirect_to: String,
        is_permanent: bool,
    },

    #[error("Error {}: {message}", .status.as_u16())]
    Http { status: StatusCode, message: String },

    #[error("You need to be logged in to view this page.")]
    LoginRequired,

    /// A message that can be safely displayed to end users
    #[error("{0}")]
    PublicMessage(String),

    #[error("{0}")]
    Invariant(String),
}

impl Error {
    /// Create a public message error from a `util_format` template
    pub fn public_message(fmt: &str, args: &[Value]) -> Self {
        Self::PublicMessage(util_format(fmt, args))
    }

    /// Create a temporary redirect
    pub fn redirect(message: impl Into<String>, redirect_to: impl Into<String>) -> Self {
        Self::Redirect {
            message: message.into(),
            redirect_to: redirect_to.into(),
            is_permanent: false,
        }
    }

    /// Create a permanent redirect
    pub fn permanent_redirect(message: impl Into<String>, redirect_to: impl Into<String>) -> Self {
        Self::Redirect {
            message: message.into(),
            redirect_to: redirect_to.into(),
            is_permanent: true,
        }
    }

    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Check whether the message may be shown to end users
    pub fn is_public(&self) -> bool {
        matches!(self, Self::PublicMessage(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
