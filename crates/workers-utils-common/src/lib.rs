//! # workers-utils-common
//!
//! Shared building blocks for the workers-utils API clients:
//!
//! - [`Error`]: redirect, HTTP, login and public-message errors
//! - [`util_format`]: Node-style `%s`/`%d`/`%j`/`%o` message formatting
//! - [`invariant`](invariant()): precondition checks with formatted messages
//! - [`public_message_from_error`]: safe user-facing messages from any error
//! - [`parse_headers`], [`json_response`], [`redirect_response`]: request and
//!   response helpers
//! - [`set_query_param`]: last-write-wins query-string updates
//! - [`HttpClient`]: the pooled reqwest client used for every outbound call

pub mod error;
pub mod format;
pub mod headers;
pub mod invariant;
pub mod public_message;
pub mod query;
pub mod responses;
pub mod transport;

pub use error::{Error, Result};
pub use format::util_format;
pub use headers::{ParsedHeaders, parse_headers};
pub use invariant::{invariant, thing_from_map_or_err, thing_or_err};
pub use public_message::{DEFAULT_FALLBACK_MESSAGE, PublicMessage, public_message_from_error};
pub use query::set_query_param;
pub use responses::{json_response, redirect_response};
pub use transport::{HttpClient, HttpConfig, ensure_crypto_provider};

#[doc(hidden)]
pub use serde_json as __serde_json;
