//! # workers-utils-bungie
//!
//! Destiny 2 helpers on top of the Bungie.net platform API.
//!
//! [`BungieHttpClient`] handles the platform envelope: API key and origin
//! headers, optional OAuth bearer tokens, and turning `ErrorCode` values into
//! [`BungieApiError`]. [`BungieApiClient`] layers the Destiny operations on
//! top of it (profiles, vendors, collectibles, activity history, Bungie name
//! search) and resolves manifest definitions through a [`DefinitionStore`].
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use workers_utils_bungie::{BungieApiClient, BungieConfig, InMemoryDefinitionStore};
//!
//! # async fn run() -> workers_utils_bungie::Result<()> {
//! let config = BungieConfig::new("api-key", "https://example.com");
//! let client = BungieApiClient::new(&config, Arc::new(InMemoryDefinitionStore::new()))?;
//!
//! let search = client.get_bnet_profile_for_bungie_name("Guardian#0042").await?;
//! println!("{:?}", search.bnet_profile);
//! # Ok(())
//! # }
//! ```
//!
//! Also included: [`oauth`] token exchange, the [`content_stack`] news feed,
//! and small formatting utilities ([`bitwise`], [`bungie_name`], [`color`],
//! [`flags`]).

pub mod api;
pub mod bitwise;
pub mod bungie_name;
pub mod color;
pub mod config;
pub mod content_stack;
pub mod definitions;
pub mod error;
pub mod flags;
pub mod http;
pub mod model;
pub mod oauth;

pub use api::{BungieApiClient, CollectibleNodeQuery, VendorQuery};
pub use bitwise::BitwiseSplit;
pub use bungie_name::{BungieName, validate_bungie_name};
pub use color::destiny_color_to_rgba;
pub use config::{BungieConfig, DEFAULT_BASE_URL, DEFAULT_WWW_URL};
pub use content_stack::{Article, ArticleKind, ContentStackClient, ContentStackSettings};
pub use definitions::{DefinitionStore, InMemoryDefinitionStore, definition_key};
pub use error::{BungieApiError, BungieError, Result};
pub use flags::{CollectibleState, VendorItemStatus, collectible_state, vendor_item_status};
pub use http::BungieHttpClient;
pub use oauth::{OauthClient, OauthOptions, OauthTokenResponse, build_oauth_url};
