//! Discord client configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use workers_utils_common::HttpConfig;

use crate::error::{DiscordError, Result};

/// Discord REST API v10 base URL
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Credentials and endpoints for the Discord client, fixed at construction
#[derive(Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Bot token, sent as `Authorization: Bot <token>`
    pub bot_token: String,

    /// Application the bot belongs to; bound into command and
    /// role-connection routes
    pub application_id: String,

    /// API base URL without a trailing slash
    pub api_base: String,

    /// Transport settings
    pub http: HttpConfig,
}

impl DiscordConfig {
    pub fn new(bot_token: impl Into<String>, application_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            application_id: application_id.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            http: HttpConfig::default(),
        }
    }

    /// Create configuration from environment variables
    ///
    /// `DISCORD_BOT_TOKEN` and `DISCORD_APPLICATION_ID` are required;
    /// `DISCORD_API_BASE` overrides the API base URL.
    pub fn from_env() -> Result<Self> {
        let bot_token = std::env::var("DISCORD_BOT_TOKEN")
            .map_err(|_| DiscordError::MissingConfig("DISCORD_BOT_TOKEN"))?;
        let application_id = std::env::var("DISCORD_APPLICATION_ID")
            .map_err(|_| DiscordError::MissingConfig("DISCORD_APPLICATION_ID"))?;

        Ok(Self {
            api_base: std::env::var("DISCORD_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            http: HttpConfig::from_env(),
            ..Self::new(bot_token, application_id)
        })
    }

    /// Override the API base URL (used to point the client at a mock server)
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }
}

impl fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("bot_token", &"<redacted>")
            .field("application_id", &self.application_id)
            .field("api_base", &self.api_base)
            .field("http", &self.http)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let config = DiscordConfig::new("secret-token", "1234");
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("1234"));
    }

    #[test]
    fn test_with_api_base_trims_slash() {
        let config = DiscordConfig::new("t", "a").with_api_base("http://127.0.0.1:8080/");
        assert_eq!(config.api_base, "http://127.0.0.1:8080");
        assert_eq!(DiscordConfig::new("t", "a").api_base, DEFAULT_API_BASE);
    }
}
