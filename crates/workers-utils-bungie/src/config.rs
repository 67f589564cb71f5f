//! Bungie.net client configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use workers_utils_common::HttpConfig;

use crate::error::{BungieError, Result};

/// Platform API root
pub const DEFAULT_BASE_URL: &str = "https://www.bungie.net/Platform";

/// Site root that manifest content paths are relative to
pub const DEFAULT_WWW_URL: &str = "https://www.bungie.net";

#[derive(Clone, Serialize, Deserialize)]
pub struct BungieConfig {
    /// Sent as `X-API-Key`
    pub api_key: String,

    /// Sent as `Origin`; must match the origin registered for the key
    pub api_origin: String,

    /// OAuth access token for calls made on behalf of a user
    #[serde(default)]
    pub access_token: Option<String>,

    /// Platform API root without a trailing slash
    pub base_url: String,

    pub www_url: String,

    pub http: HttpConfig,
}

impl BungieConfig {
    pub fn new(api_key: impl Into<String>, api_origin: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_origin: api_origin.into(),
            access_token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            www_url: DEFAULT_WWW_URL.to_string(),
            http: HttpConfig::default(),
        }
    }

    /// Create configuration from environment variables
    ///
    /// `BUNGIE_API_KEY` and `BUNGIE_API_ORIGIN` are required.
    /// `BUNGIE_ACCESS_TOKEN` and `BUNGIE_BASE_URL` are optional.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("BUNGIE_API_KEY")
            .map_err(|_| BungieError::MissingConfig("BUNGIE_API_KEY"))?;
        let api_origin = std::env::var("BUNGIE_API_ORIGIN")
            .map_err(|_| BungieError::MissingConfig("BUNGIE_API_ORIGIN"))?;

        let mut config = Self::new(api_key, api_origin);
        config.access_token = std::env::var("BUNGIE_ACCESS_TOKEN").ok();
        if let Ok(base_url) = std::env::var("BUNGIE_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        config.http = HttpConfig::from_env();
        Ok(config)
    }

    #[must_use]
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_www_url(mut self, www_url: impl Into<String>) -> Self {
        self.www_url = www_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl fmt::Debug for BungieConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BungieConfig")
            .field("api_key", &"<redacted>")
            .field("api_origin", &self.api_origin)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("base_url", &self.base_url)
            .field("www_url", &self.www_url)
            .field("http", &self.http)
            .finish()
    }
}
