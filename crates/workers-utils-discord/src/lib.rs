//! # workers-utils-discord
//!
//! Typed access to the Discord REST API (v10) for bots.
//!
//! The crate is built around a generic [`dispatch`] layer: an endpoint is
//! declared once with its method, route and types, and the resulting
//! [`Handler`] takes care of URL building, authentication, query merging and
//! response classification. [`DiscordApiClient`] bundles the endpoints a bot
//! typically needs.
//!
//! ```rust,no_run
//! use workers_utils_discord::{DiscordApiClient, DiscordConfig};
//! use workers_utils_discord::model::GetGuildQuery;
//!
//! # async fn run() -> workers_utils_discord::Result<()> {
//! let client = DiscordApiClient::new(&DiscordConfig::new("bot-token", "application-id"))?;
//!
//! let query = GetGuildQuery { with_counts: Some(true) };
//! if let Some(guild) = client.get_guild.call(["81384788765712384"], Some(&query), None).await? {
//!     println!("{} has ~{:?} members", guild.name, guild.approximate_member_count);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Helpers for message formatting live alongside the client:
//! [`timestamp`], [`urls`], [`spoiler`] and [`permissions`].

pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod permissions;
pub mod routes;
pub mod spoiler;
pub mod timestamp;
pub mod urls;

pub use client::DiscordApiClient;
pub use config::{DEFAULT_API_BASE, DiscordConfig};
pub use dispatch::{Dispatcher, Handler, Method, NoBody, NoQuery, OptionalBody, RequiredBody};
pub use error::{DiscordError, DiscordResponseError, Result};
pub use permissions::{Permission, member_has_permissions};
pub use spoiler::unicode_spoilerify;
pub use timestamp::{TimestampFormat, discord_timestamp};
pub use urls::{AvatarSize, avatar_url, url_for_channel, url_for_message};
