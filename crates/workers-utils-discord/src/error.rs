//! Error types for Discord API calls

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use thiserror::Error;
use url::Url;
use workers_utils_common::PublicMessage;

#[derive(Debug, Error)]
pub enum DiscordError {
    /// The request never produced a response (connection, timeout, body read)
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Discord answered with a status outside 200..=299
    #[error(transparent)]
    Response(#[from] DiscordResponseError),

    /// A 2xx response whose body is not the expected JSON
    #[error("JSON parse error for the following content: `{response_text}`")]
    Parse {
        #[source]
        source: serde_json::Error,
        response_text: String,
    },

    /// The request body or query could not be serialized
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Query parameters must serialize to an object, got {0}")]
    InvalidQuery(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Bot token is not a valid header value")]
    InvalidToken,

    #[error("Missing required configuration: {0}")]
    MissingConfig(&'static str),
}

impl DiscordError {
    /// HTTP status of a remote response error
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Response(err) => Some(err.status),
            _ => None,
        }
    }

    /// Raw body text, for response and parse errors
    pub fn response_text(&self) -> Option<&str> {
        match self {
            Self::Response(err) => Some(&err.response_text),
            Self::Parse { response_text, .. } => Some(response_text),
            _ => None,
        }
    }
}

impl PublicMessage for DiscordError {
    fn public_message(&self) -> Option<&str> {
        None
    }
}

/// A non-2xx response from Discord, with everything the caller needs to
/// explain it to a human
#[derive(Debug, Error)]
#[error("{} {status_text}: {response_text}", .status.as_u16())]
pub struct DiscordResponseError {
    pub status: StatusCode,
    /// Canonical reason phrase for `status`
    pub status_text: String,
    pub url: Url,
    pub headers: HeaderMap,
    pub response_text: String,
}

pub type Result<T> = std::result::Result<T, DiscordError>;
