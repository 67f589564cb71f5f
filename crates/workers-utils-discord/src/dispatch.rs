//! # Generic request dispatcher
//!
//! Every Discord endpoint is described by an HTTP [`Method`], a route
//! function mapping ordered path parameters to a path fragment, and three
//! types fixed when the endpoint is declared:
//!
//! - the **body kind** ([`NoBody`], [`OptionalBody`] or [`RequiredBody`]),
//!   which decides the shape of the handler's `call` method,
//! - the response type `R`,
//! - the query-parameter type `Q` ([`NoQuery`] when there is none).
//!
//! [`Dispatcher::build_handler`] plus [`HandlerBuilder::route`] turn that
//! description into a [`Handler`]:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use workers_utils_discord::dispatch::{Dispatcher, Method, NoBody, NoQuery, OptionalBody};
//! use workers_utils_discord::model::{CreateMessage, Guild, Message};
//! use workers_utils_discord::{DiscordConfig, routes};
//!
//! # async fn run() -> workers_utils_discord::Result<()> {
//! let dispatcher = Arc::new(Dispatcher::new(&DiscordConfig::new("token", "app"))?);
//!
//! let get_guild = dispatcher
//!     .build_handler::<NoBody, Guild, NoQuery>(Method::Get)
//!     .route(routes::guild);
//! let guild = get_guild.call(["81384788765712384"], None).await?;
//!
//! let post_message = dispatcher
//!     .build_handler::<OptionalBody<CreateMessage>, Message, NoQuery>(Method::Post)
//!     .route(routes::channel_messages);
//! let body = CreateMessage::text("hi");
//! let message = post_message.call(["41771983423143937"], Some(&body), None).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Per-call behaviour
//!
//! 1. The URL is the API base followed by the route function's output.
//! 2. A `GET` body is written into the query string, one pair per top-level
//!    field. Any other method sends the body as JSON.
//! 3. Query parameters are merged into the query string after body pairs;
//!    writing a key that is already present replaces it.
//! 4. `Authorization: Bot <token>` and `Content-Type: application/json` go
//!    on every request.
//! 5. The body is read as text before anything else happens to it.
//! 6. A status outside `200..=299` fails with [`DiscordResponseError`].
//! 7. `204 No Content` resolves to `Ok(None)` without parsing.
//! 8. Anything else is parsed as JSON into `R`. Parse failures are logged
//!    with the offending text and returned as [`DiscordError::Parse`].
//!
//! Exactly one request is sent per call. Nothing is retried or cached.

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use url::Url;
use workers_utils_common::{HttpClient, set_query_param};
use workers_utils_common::format::js_string;

use crate::config::DiscordConfig;
use crate::error::{DiscordError, DiscordResponseError, Result};

/// HTTP methods Discord endpoints use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Delete,
    Get,
    Patch,
    Post,
    Put,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delete => "DELETE",
            Self::Get => "GET",
            Self::Patch => "PATCH",
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Delete => Self::DELETE,
            Method::Get => Self::GET,
            Method::Patch => Self::PATCH,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Marker for how an endpoint takes its body
pub trait BodyKind: sealed::Sealed {}

/// The endpoint takes no body
#[derive(Debug)]
pub struct NoBody;

/// The endpoint takes a body whose fields are all optional, so the body
/// itself may be left out
#[derive(Debug)]
pub struct OptionalBody<B>(PhantomData<fn() -> B>);

/// The endpoint cannot be called without a body
#[derive(Debug)]
pub struct RequiredBody<B>(PhantomData<fn() -> B>);

impl sealed::Sealed for NoBody {}
impl<B> sealed::Sealed for OptionalBody<B> {}
impl<B> sealed::Sealed for RequiredBody<B> {}
impl BodyKind for NoBody {}
impl<B> BodyKind for OptionalBody<B> {}
impl<B> BodyKind for RequiredBody<B> {}

/// Query type for endpoints without query parameters
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NoQuery;

type RouteFn<const N: usize> = dyn Fn([&str; N]) -> String + Send + Sync;

/// Read-only state shared by every handler: transport, base URL and the
/// fixed request headers
pub struct Dispatcher {
    http: HttpClient,
    api_base: String,
    headers: HeaderMap,
}

impl Dispatcher {
    /// Create a dispatcher with a transport built from `config.http`
    pub fn new(config: &DiscordConfig) -> Result<Self> {
        let http = HttpClient::with_config(&config.http)?;
        Self::with_http_client(http, &config.api_base, &config.bot_token)
    }

    /// Create a dispatcher over an existing transport
    pub fn with_http_client(http: HttpClient, api_base: &str, bot_token: &str) -> Result<Self> {
        let mut authorization = HeaderValue::from_str(&format!("Bot {bot_token}"))
            .map_err(|_| DiscordError::InvalidToken)?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            headers,
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Start declaring an endpoint for `method`
    ///
    /// `K` is the body kind, `R` the response type and `Q` the query type
    /// ([`NoQuery`] for endpoints without one).
    pub fn build_handler<K, R, Q>(self: &Arc<Self>, method: Method) -> HandlerBuilder<K, R, Q>
    where
        K: BodyKind,
    {
        HandlerBuilder {
            dispatcher: Arc::clone(self),
            method,
            _marker: PhantomData,
        }
    }

    /// Send one request and classify the response
    async fn dispatch<R>(
        &self,
        method: Method,
        route: &str,
        body: Option<Value>,
        query: Option<Value>,
    ) -> Result<Option<R>>
    where
        R: DeserializeOwned,
    {
        let mut url = Url::parse(&format!("{}{}", self.api_base, route))?;
        let mut payload = None;

        if let Some(body) = body.filter(|body| !body.is_null()) {
            if method == Method::Get {
                for (key, value) in query_pairs(&body)? {
                    set_query_param(&mut url, &key, &value);
                }
            } else {
                payload = Some(serde_json::to_vec(&body)?);
            }
        }

        if let Some(query) = query {
            for (key, value) in query_pairs(&query)? {
                set_query_param(&mut url, &key, &value);
            }
        }

        tracing::debug!(%method, %url, "Discord request");

        let mut request = self
            .http
            .inner()
            .request(method.into(), url.clone())
            .headers(self.headers.clone());
        if let Some(payload) = payload {
            request = request.body(payload);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(DiscordResponseError {
                status,
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                url,
                headers,
                response_text,
            }
            .into());
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        match serde_json::from_str(&response_text) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(source) => {
                tracing::error!(
                    %url,
                    "JSON parse error for the following content: `{response_text}`"
                );
                Err(DiscordError::Parse {
                    source,
                    response_text,
                })
            }
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

/// First half of an endpoint declaration: method and types are fixed, the
/// route is not
pub struct HandlerBuilder<K, R, Q = NoQuery> {
    dispatcher: Arc<Dispatcher>,
    method: Method,
    _marker: PhantomData<fn() -> (K, R, Q)>,
}

impl<K: BodyKind, R, Q> HandlerBuilder<K, R, Q> {
    /// Finish the declaration with the route for `N` path parameters
    pub fn route<const N: usize, F>(self, route: F) -> Handler<N, K, R, Q>
    where
        F: Fn([&str; N]) -> String + Send + Sync + 'static,
    {
        Handler {
            dispatcher: self.dispatcher,
            method: self.method,
            route: Arc::new(route),
            _marker: PhantomData,
        }
    }
}

/// A callable endpoint
///
/// The signature of `call` depends on the body kind:
///
/// | Kind | Signature |
/// |------|-----------|
/// | [`NoBody`] | `call(params, query)` |
/// | [`OptionalBody<B>`] | `call(params, Option<&B>, query)` |
/// | [`RequiredBody<B>`] | `call(params, &B, query)` |
///
/// Every call resolves to `Ok(Some(R))`, `Ok(None)` for `204 No Content`, or
/// an error.
pub struct Handler<const N: usize, K, R, Q = NoQuery> {
    dispatcher: Arc<Dispatcher>,
    method: Method,
    route: Arc<RouteFn<N>>,
    _marker: PhantomData<fn() -> (K, R, Q)>,
}

impl<const N: usize, K, R, Q> Clone for Handler<N, K, R, Q> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: Arc::clone(&self.dispatcher),
            method: self.method,
            route: Arc::clone(&self.route),
            _marker: PhantomData,
        }
    }
}

impl<const N: usize, K, R, Q> fmt::Debug for Handler<N, K, R, Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("method", &self.method)
            .field("params", &N)
            .finish_non_exhaustive()
    }
}

impl<const N: usize, K, R, Q> Handler<N, K, R, Q>
where
    R: DeserializeOwned,
    Q: Serialize,
{
    pub fn method(&self) -> Method {
        self.method
    }

    /// Path this handler requests for `params`, without the API base
    pub fn path(&self, params: [&str; N]) -> String {
        (self.route)(params)
    }

    async fn execute<B>(&self, params: [&str; N], body: Option<&B>, query: Option<&Q>) -> Result<Option<R>>
    where
        B: Serialize + ?Sized,
    {
        let route = (self.route)(params);
        let body = body.map(serde_json::to_value).transpose()?;
        let query = query.map(serde_json::to_value).transpose()?;
        self.dispatcher.dispatch(self.method, &route, body, query).await
    }
}

impl<const N: usize, R, Q> Handler<N, NoBody, R, Q>
where
    R: DeserializeOwned,
    Q: Serialize,
{
    pub async fn call(&self, params: [&str; N], query: Option<&Q>) -> Result<Option<R>> {
        self.execute::<Value>(params, None, query).await
    }
}

impl<const N: usize, B, R, Q> Handler<N, OptionalBody<B>, R, Q>
where
    B: Serialize,
    R: DeserializeOwned,
    Q: Serialize,
{
    pub async fn call(&self, params: [&str; N], body: Option<&B>, query: Option<&Q>) -> Result<Option<R>> {
        self.execute(params, body, query).await
    }
}

impl<const N: usize, B, R, Q> Handler<N, RequiredBody<B>, R, Q>
where
    B: Serialize,
    R: DeserializeOwned,
    Q: Serialize,
{
    pub async fn call(&self, params: [&str; N], body: &B, query: Option<&Q>) -> Result<Option<R>> {
        self.execute(params, Some(body), query).await
    }
}

/// Flatten a serialized body or query into string pairs
///
/// `null` fields are skipped; everything else is coerced the way JavaScript
/// coerces values to strings.
fn query_pairs(value: &Value) -> Result<Vec<(String, String)>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Object(map) => Ok(map
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| (key.clone(), js_string(value)))
            .collect()),
        other => Err(DiscordError::InvalidQuery(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_query_pairs_coerce_values() {
        let pairs = query_pairs(&json!({
            "limit": 100,
            "with_counts": true,
            "after": "123",
            "skipped": null
        }))
        .expect("object should flatten");

        assert_eq!(
            pairs,
            vec![
                ("after".to_string(), "123".to_string()),
                ("limit".to_string(), "100".to_string()),
                ("with_counts".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_pairs_rejects_non_objects() {
        assert!(query_pairs(&Value::Null).expect("null is empty").is_empty());
        assert!(matches!(
            query_pairs(&json!([1, 2])),
            Err(DiscordError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_method_conversion() {
        assert_eq!(reqwest::Method::from(Method::Patch), reqwest::Method::PATCH);
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_handler_path() {
        let dispatcher = Arc::new(
            Dispatcher::new(&DiscordConfig::new("token", "app")).expect("dispatcher should build"),
        );
        let handler = dispatcher
            .build_handler::<NoBody, Value, NoQuery>(Method::Delete)
            .route(crate::routes::channel_message);

        assert_eq!(handler.method(), Method::Delete);
        assert_eq!(handler.path(["c1", "m1"]), "/channels/c1/messages/m1");
    }

    #[test]
    fn test_invalid_token_rejected() {
        let http = HttpClient::new().expect("client should build");
        let result = Dispatcher::with_http_client(http, "https://discord.com/api/v10", "bad\ntoken");
        assert!(matches!(result, Err(DiscordError::InvalidToken)));
    }
}
