//! HTTP transport shared by the API clients
//!
//! Every client issues one request per call through a [`reqwest::Client`].
//! Building a client is comparatively expensive, so [`HttpClient::new`] hands
//! out clones of a single process-wide client while
//! [`HttpClient::with_config`] builds a dedicated one.

use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Once, OnceLock};
use std::time::Duration;

/// Global shared HTTP client
static GLOBAL_HTTP_CLIENT: OnceLock<Arc<Client>> = OnceLock::new();

static CRYPTO_PROVIDER: Once = Once::new();

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("workers-utils/", env!("CARGO_PKG_VERSION"));

/// Install the `ring` rustls provider for the process.
///
/// reqwest is built without a default provider. Installing twice is a no-op,
/// and a provider installed by the host application wins.
pub fn ensure_crypto_provider() {
    CRYPTO_PROVIDER.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Cheaply cloneable handle to a pooled HTTP client
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Shared client with the default [`HttpConfig`]
    pub fn new() -> Result<Self, reqwest::Error> {
        if let Some(client) = GLOBAL_HTTP_CLIENT.get() {
            return Ok(Self {
                client: Arc::clone(client),
            });
        }

        let client = Arc::new(Self::build(&HttpConfig::default())?);
        let client = GLOBAL_HTTP_CLIENT.get_or_init(|| client);
        Ok(Self {
            client: Arc::clone(client),
        })
    }

    /// Dedicated client with custom configuration
    pub fn with_config(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Arc::new(Self::build(config)?),
        })
    }

    fn build(config: &HttpConfig) -> Result<Client, reqwest::Error> {
        ensure_crypto_provider();

        let mut builder = ClientBuilder::new()
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.as_str());

        if config.enable_compression {
            builder = builder.gzip(true).brotli(true).deflate(true);
        }

        builder.build()
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout
    pub timeout: Duration,

    pub connect_timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Accept gzip, brotli and deflate responses
    pub enable_compression: bool,

    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            enable_compression: true,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl HttpConfig {
    /// Read timeouts from `WORKERS_HTTP_TIMEOUT` and
    /// `WORKERS_HTTP_CONNECT_TIMEOUT` (seconds), falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            timeout: std::env::var("WORKERS_HTTP_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .map_or(defaults.timeout, Duration::from_secs),
            connect_timeout: std::env::var("WORKERS_HTTP_CONNECT_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .map_or(defaults.connect_timeout, Duration::from_secs),
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_client_is_reused() {
        let first = HttpClient::new().expect("client should build");
        let second = HttpClient::new().expect("client should build");
        assert!(Arc::ptr_eq(&first.client, &second.client));
    }

    #[test]
    fn test_custom_client_is_dedicated() {
        let shared = HttpClient::new().expect("client should build");
        let config = HttpConfig {
            timeout: Duration::from_secs(5),
            enable_compression: false,
            ..HttpConfig::default()
        };
        let custom = HttpClient::with_config(&config).expect("client should build");
        assert!(!Arc::ptr_eq(&shared.client, &custom.client));
    }

    #[test]
    fn test_default_config() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("workers-utils/"));
    }
}
