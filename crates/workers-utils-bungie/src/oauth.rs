//! Bungie.net OAuth
//!
//! See <https://github.com/Bungie-net/api/wiki/OAuth-Documentation>.

use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;
use workers_utils_common::HttpClient;

use crate::error::{BungieError, Result};
use crate::http::api_headers;

pub const OAUTH_TOKEN_URL: &str = "https://www.bungie.net/platform/app/oauth/token/";
pub const OAUTH_AUTHORIZE_URL: &str = "https://www.bungie.net/en/OAuth/Authorize";

/// Tokens issued by the token endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OauthTokenResponse {
    pub access_token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Seconds until `access_token` expires
    pub expires_in: u64,
    pub refresh_token: String,
    /// Seconds until `refresh_token` expires
    pub refresh_expires_in: u64,
    pub membership_id: String,
}

/// Credentials of a confidential OAuth client
#[derive(Clone)]
pub struct OauthOptions {
    pub client_id: String,
    pub client_secret: String,
    pub api_key: String,
    pub api_origin: String,
}

impl fmt::Debug for OauthOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OauthOptions")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("api_key", &"<redacted>")
            .field("api_origin", &self.api_origin)
            .finish()
    }
}

/// URL that starts the authorization-code flow; `state` comes back
/// unchanged on the redirect
pub fn build_oauth_url(client_id: &str, state: &str) -> Result<Url> {
    let mut url = Url::parse(OAUTH_AUTHORIZE_URL)?;
    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", client_id)
        .append_pair("state", state);
    Ok(url)
}

/// Exchanges codes and refresh tokens at the token endpoint
#[derive(Debug, Clone)]
pub struct OauthClient {
    http: HttpClient,
    options: OauthOptions,
    token_url: String,
}

impl OauthClient {
    pub fn new(http: HttpClient, options: OauthOptions) -> Self {
        Self {
            http,
            options,
            token_url: OAUTH_TOKEN_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Trade an authorization code for tokens
    pub async fn get_oauth_token(&self, authorization_code: &str) -> Result<OauthTokenResponse> {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", authorization_code),
        ])
        .await
    }

    /// Trade a refresh token for a fresh set of tokens
    pub async fn refresh_oauth_token(&self, refresh_token: &str) -> Result<OauthTokenResponse> {
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn token_request(&self, grant: &[(&str, &str)]) -> Result<OauthTokenResponse> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(grant.iter().copied())
            .append_pair("client_id", &self.options.client_id)
            .append_pair("client_secret", &self.options.client_secret)
            .finish();

        let mut headers: HeaderMap = api_headers(&self.options.api_key, &self.options.api_origin)?;
        headers.insert(
            CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/x-www-form-urlencoded"),
        );

        tracing::info!(url = %self.token_url, "Requesting Bungie OAuth token");
        let response = self
            .http
            .inner()
            .post(&self.token_url)
            .headers(headers)
            .body(body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if status != StatusCode::OK {
            return Err(BungieError::Status {
                status,
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|source| BungieError::Parse {
            source,
            response_text: text,
        })
    }
}
