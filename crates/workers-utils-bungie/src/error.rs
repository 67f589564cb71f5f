//! Error types for Bungie.net calls

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use workers_utils_common::PublicMessage;

use crate::model::PlatformErrorCode;

const SYSTEM_DISABLED_MESSAGE: &str = "The Bungie API is currently disabled.";

#[derive(Debug, Error)]
pub enum BungieError {
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The platform answered with an `ErrorCode` other than `Success`
    #[error(transparent)]
    Api(#[from] BungieApiError),

    /// Non-2xx status without a platform error in the body
    #[error("{} {status_text}: {body}", .status.as_u16())]
    Status {
        status: StatusCode,
        status_text: String,
        body: String,
    },

    #[error("Could not parse response text to JSON: `{response_text}`")]
    Parse {
        #[source]
        source: serde_json::Error,
        response_text: String,
    },

    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A configured value cannot be sent as the named header
    #[error("Invalid value for header {0}")]
    InvalidHeader(&'static str),

    #[error("Missing required configuration: {0}")]
    MissingConfig(&'static str),

    #[error("ContentStack error: {0}")]
    ContentStack(String),

    /// Invariant failures and user-facing messages
    #[error(transparent)]
    Common(#[from] workers_utils_common::Error),
}

impl BungieError {
    pub(crate) fn content_stack(message: impl Into<String>) -> Self {
        Self::ContentStack(message.into())
    }

    /// Platform error code, for envelope errors
    pub fn error_code(&self) -> Option<PlatformErrorCode> {
        match self {
            Self::Api(err) => Some(err.error_code),
            _ => None,
        }
    }
}

impl PublicMessage for BungieError {
    fn public_message(&self) -> Option<&str> {
        match self {
            Self::Common(err) => PublicMessage::public_message(err),
            Self::Api(err) if err.error_code == PlatformErrorCode::SYSTEM_DISABLED => {
                Some(SYSTEM_DISABLED_MESSAGE)
            }
            _ => None,
        }
    }
}

/// Platform-level failure reported inside the response envelope
#[derive(Debug, Error)]
#[error("{}: {error_status}", .error_code.0)]
pub struct BungieApiError {
    pub error_code: PlatformErrorCode,
    pub error_status: String,
    pub message: String,
    /// The whole envelope as received
    pub response: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorEnvelope {
    error_code: PlatformErrorCode,
    error_status: String,
    #[serde(default)]
    message: String,
}

impl BungieApiError {
    /// Extract an error from a parsed envelope
    ///
    /// Returns `None` for bodies that are not envelopes and for envelopes
    /// reporting success.
    pub fn from_envelope(response: &Value) -> Option<Self> {
        let envelope = ErrorEnvelope::deserialize(response).ok()?;
        if envelope.error_code == PlatformErrorCode::SUCCESS {
            return None;
        }
        Some(Self {
            error_code: envelope.error_code,
            error_status: envelope.error_status,
            message: envelope.message,
            response: response.clone(),
        })
    }

    /// Short explanation suitable for showing to users
    pub fn nice_message(&self) -> String {
        if self.error_code == PlatformErrorCode::SYSTEM_DISABLED {
            SYSTEM_DISABLED_MESSAGE.to_string()
        } else {
            format!("{} {}", self.error_code.0, self.error_status)
        }
    }
}

pub type Result<T> = std::result::Result<T, BungieError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_error_detection() {
        let disabled = json!({
            "ErrorCode": 5,
            "ErrorStatus": "SystemDisabled",
            "Message": "This system is temporarily disabled for maintenance.",
            "ThrottleSeconds": 0,
            "MessageData": {}
        });
        let err = BungieApiError::from_envelope(&disabled).expect("should be an error");
        assert_eq!(err.error_code, PlatformErrorCode::SYSTEM_DISABLED);
        assert_eq!(err.to_string(), "5: SystemDisabled");
        assert_eq!(err.nice_message(), "The Bungie API is currently disabled.");

        let success = json!({"ErrorCode": 1, "ErrorStatus": "Success", "Response": {}});
        assert!(BungieApiError::from_envelope(&success).is_none());
        assert!(BungieApiError::from_envelope(&json!({"data": []})).is_none());
    }

    #[test]
    fn test_nice_message_for_other_codes() {
        let err = BungieApiError::from_envelope(&json!({
            "ErrorCode": 1601,
            "ErrorStatus": "DestinyAccountNotFound"
        }))
        .expect("should be an error");
        assert_eq!(err.nice_message(), "1601 DestinyAccountNotFound");
    }

    #[test]
    fn test_public_messages() {
        let disabled = BungieError::from(
            BungieApiError::from_envelope(&json!({"ErrorCode": 5, "ErrorStatus": "SystemDisabled"}))
                .expect("should be an error"),
        );
        assert_eq!(
            disabled.public_message(),
            Some("The Bungie API is currently disabled.")
        );
        assert_eq!(disabled.error_code(), Some(PlatformErrorCode::SYSTEM_DISABLED));

        let public = BungieError::from(workers_utils_common::Error::PublicMessage(
            "No valid Destiny profiles could be found for this user.".to_string(),
        ));
        assert_eq!(
            public.public_message(),
            Some("No valid Destiny profiles could be found for this user.")
        );

        let status = BungieError::Status {
            status: StatusCode::BAD_GATEWAY,
            status_text: "Bad Gateway".to_string(),
            body: "upstream".to_string(),
        };
        assert_eq!(status.public_message(), None);
        assert_eq!(status.to_string(), "502 Bad Gateway: upstream");
    }
}
