//! Bungie.net platform transport
//!
//! Every platform response is wrapped in a [`ServerResponse`] envelope. The
//! envelope is checked before the payload is typed, so a platform error is
//! reported as [`BungieError::Api`] even when `Response` is missing.

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, ORIGIN};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use url::Url;
use workers_utils_common::{HttpClient, set_query_param};

use crate::config::BungieConfig;
use crate::error::{BungieApiError, BungieError, Result};
use crate::model::ServerResponse;

const X_API_KEY: HeaderName = HeaderName::from_static("x-api-key");

/// Build the headers every Bungie.net request carries
pub(crate) fn api_headers(api_key: &str, api_origin: &str) -> Result<HeaderMap> {
    let mut api_key =
        HeaderValue::from_str(api_key).map_err(|_| BungieError::InvalidHeader("X-API-Key"))?;
    api_key.set_sensitive(true);
    let origin =
        HeaderValue::from_str(api_origin).map_err(|_| BungieError::InvalidHeader("Origin"))?;

    let mut headers = HeaderMap::new();
    headers.insert(X_API_KEY, api_key);
    headers.insert(ORIGIN, origin);
    Ok(headers)
}

/// Authenticated client for the platform API
#[derive(Clone)]
pub struct BungieHttpClient {
    http: HttpClient,
    base_url: String,
    www_url: String,
    headers: HeaderMap,
}

impl BungieHttpClient {
    pub fn new(config: &BungieConfig) -> Result<Self> {
        let http = HttpClient::with_config(&config.http)?;
        Self::with_http_client(http, config)
    }

    /// Reuse an existing transport, e.g. the process-wide one
    pub fn with_http_client(http: HttpClient, config: &BungieConfig) -> Result<Self> {
        let mut headers = api_headers(&config.api_key, &config.api_origin)?;
        if let Some(token) = &config.access_token {
            let mut bearer = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| BungieError::InvalidHeader("Authorization"))?;
            bearer.set_sensitive(true);
            headers.insert(AUTHORIZATION, bearer);
        }

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            www_url: config.www_url.trim_end_matches('/').to_string(),
            headers,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET` a platform path such as `/Destiny2/Manifest/`
    pub async fn get<T>(&self, path: &str, params: &[(&str, String)]) -> Result<ServerResponse<T>>
    where
        T: DeserializeOwned,
    {
        self.request(Method::GET, path, params, None).await
    }

    /// `POST` a JSON body to a platform path
    pub async fn post<T, B>(
        &self,
        path: &str,
        params: &[(&str, String)],
        body: &B,
    ) -> Result<ServerResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, path, params, Some(body)).await
    }

    /// Send one platform request and unwrap its envelope
    ///
    /// Query parameters replace any same-named ones already in `path`.
    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<ServerResponse<T>>
    where
        T: DeserializeOwned,
    {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))?;
        for (key, value) in params {
            set_query_param(&mut url, key, value);
        }

        tracing::info!("{method} {url}");

        let mut request = self
            .http
            .inner()
            .request(method, url.clone())
            .headers(self.headers.clone());
        if let Some(body) = body.filter(|body| !body.is_null()) {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(&body)?);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        let value = parse_json(&url, &text)?;

        if let Some(err) = BungieApiError::from_envelope(&value) {
            tracing::warn!(
                %url,
                error_code = %err.error_code,
                error_status = %err.error_status,
                "Bungie API error"
            );
            return Err(err.into());
        }

        if !status.is_success() {
            return Err(BungieError::Status {
                status,
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body: text,
            });
        }

        serde_json::from_value(value).map_err(|source| {
            tracing::error!(%url, "Unexpected response shape: `{text}`");
            BungieError::Parse {
                source,
                response_text: text,
            }
        })
    }

    /// Fetch raw JSON content from the Bungie.net site, outside the
    /// platform envelope (manifest tables)
    pub async fn get_content<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = Url::parse(&format!("{}{}", self.www_url, path))?;
        tracing::info!("GET {url}");

        let response = self
            .http
            .inner()
            .get(url.clone())
            .headers(self.headers.clone())
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(BungieError::Status {
                status,
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body: text,
            });
        }

        let value = parse_json(&url, &text)?;
        serde_json::from_value(value).map_err(|source| BungieError::Parse {
            source,
            response_text: text,
        })
    }
}

fn parse_json(url: &Url, text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|source| {
        tracing::error!(%url, "Could not parse response text to JSON: `{text}`");
        BungieError::Parse {
            source,
            response_text: text.to_string(),
        }
    })
}

impl fmt::Debug for BungieHttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BungieHttpClient")
            .field("base_url", &self.base_url)
            .field("www_url", &self.www_url)
            .field("authenticated", &self.headers.contains_key(AUTHORIZATION))
            .finish_non_exhaustive()
    }
}
