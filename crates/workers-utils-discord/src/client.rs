//! Discord API client
//!
//! [`DiscordApiClient`] holds one [`Handler`] per supported endpoint. All
//! handlers share a single [`Dispatcher`], so cloning the client or an
//! individual handler is cheap.

use serde_json::Value;
use std::sync::Arc;

use crate::config::DiscordConfig;
use crate::dispatch::{Dispatcher, Handler, Method, NoBody, OptionalBody, RequiredBody};
use crate::error::Result;
use crate::model::{
    ApplicationCommand, Channel, CreateApplicationCommand, CreateGuildChannel, CreateMessage,
    CreateWebhook, EditMessage, EditWebhookMessage, ExecuteWebhook, ExecuteWebhookQuery,
    GetCurrentUserGuildsQuery, GetGuildMembersQuery, GetGuildQuery, Guild, GuildMember, Message,
    ModifyChannel, ModifyGuildMember, PartialGuild, RoleConnectionMetadata, StartThreadFromMessage,
    User, Webhook,
};
use crate::routes;

/// Typed handlers for the Discord endpoints the bot uses
///
/// Endpoints that answer `204 No Content` resolve to `Ok(None)`; their
/// response type is [`Value`] so an unexpected body is still readable.
#[derive(Clone, Debug)]
pub struct DiscordApiClient {
    application_id: String,

    pub delete_channel: Handler<1, NoBody, Channel>,
    pub delete_channel_message: Handler<2, NoBody, Value>,
    pub delete_thread_member: Handler<2, NoBody, Value>,
    pub get_channel: Handler<1, NoBody, Channel>,
    pub get_channels: Handler<1, NoBody, Vec<Channel>>,
    pub get_channel_webhooks: Handler<1, NoBody, Vec<Webhook>>,
    pub get_guild: Handler<1, OptionalBody<GetGuildQuery>, Guild>,
    pub get_guild_member: Handler<2, NoBody, GuildMember>,
    pub get_guild_members: Handler<1, OptionalBody<GetGuildMembersQuery>, Vec<GuildMember>>,
    pub get_guilds: Handler<0, OptionalBody<GetCurrentUserGuildsQuery>, Vec<PartialGuild>>,
    pub get_user: Handler<1, NoBody, User>,
    /// Bound to the configured application
    pub get_role_connection_metadata: Handler<0, NoBody, Vec<RoleConnectionMetadata>>,
    pub get_webhook_message: Handler<3, NoBody, Message>,
    pub patch_channel: Handler<1, OptionalBody<ModifyChannel>, Channel>,
    pub patch_channel_message: Handler<2, OptionalBody<EditMessage>, Message>,
    pub patch_guild_member: Handler<2, OptionalBody<ModifyGuildMember>, GuildMember>,
    pub patch_webhook_message: Handler<3, OptionalBody<EditWebhookMessage>, Message>,
    pub post_channel_messages: Handler<1, OptionalBody<CreateMessage>, Message>,
    pub post_channels: Handler<1, RequiredBody<CreateGuildChannel>, Channel>,
    pub post_channel_webhooks: Handler<1, RequiredBody<CreateWebhook>, Webhook>,
    pub post_followup_webhook_message: Handler<2, OptionalBody<ExecuteWebhook>, Message>,
    pub post_thread_with_message: Handler<2, RequiredBody<StartThreadFromMessage>, Channel>,
    /// Resolves to `None` unless `wait=true` is passed
    pub post_webhook_message: Handler<2, OptionalBody<ExecuteWebhook>, Message, ExecuteWebhookQuery>,
    /// Bound to the configured application; takes the guild id
    pub put_guild_commands:
        Handler<1, RequiredBody<Vec<CreateApplicationCommand>>, Vec<ApplicationCommand>>,
    /// Bound to the configured application
    pub put_role_connection_metadata:
        Handler<0, RequiredBody<Vec<RoleConnectionMetadata>>, Vec<RoleConnectionMetadata>>,
    pub put_thread_members: Handler<2, NoBody, Value>,
}

impl DiscordApiClient {
    /// Build a client and its transport from `config`
    pub fn new(config: &DiscordConfig) -> Result<Self> {
        let dispatcher = Arc::new(Dispatcher::new(config)?);
        Ok(Self::with_dispatcher(&dispatcher, &config.application_id))
    }

    /// Build a client from environment variables (see [`DiscordConfig::from_env`])
    pub fn from_env() -> Result<Self> {
        Self::new(&DiscordConfig::from_env()?)
    }

    /// Build a client over an existing dispatcher
    pub fn with_dispatcher(dispatcher: &Arc<Dispatcher>, application_id: &str) -> Self {
        let d = dispatcher;

        let app_id = application_id.to_string();
        let guild_commands = move |[guild_id]: [&str; 1]| {
            routes::application_guild_commands([app_id.as_str(), guild_id])
        };
        let app_id = application_id.to_string();
        let get_metadata = move |[]: [&str; 0]| {
            routes::application_role_connection_metadata([app_id.as_str()])
        };
        let app_id = application_id.to_string();
        let put_metadata = move |[]: [&str; 0]| {
            routes::application_role_connection_metadata([app_id.as_str()])
        };

        Self {
            application_id: application_id.to_string(),

            delete_channel: d.build_handler(Method::Delete).route(routes::channel),
            delete_channel_message: d.build_handler(Method::Delete).route(routes::channel_message),
            delete_thread_member: d.build_handler(Method::Delete).route(routes::thread_members),
            get_channel: d.build_handler(Method::Get).route(routes::channel),
            get_channels: d.build_handler(Method::Get).route(routes::guild_channels),
            get_channel_webhooks: d.build_handler(Method::Get).route(routes::channel_webhooks),
            get_guild: d.build_handler(Method::Get).route(routes::guild),
            get_guild_member: d.build_handler(Method::Get).route(routes::guild_member),
            get_guild_members: d.build_handler(Method::Get).route(routes::guild_members),
            get_guilds: d.build_handler(Method::Get).route(routes::user_guilds),
            get_user: d.build_handler(Method::Get).route(routes::user),
            get_role_connection_metadata: d
                .build_handler(Method::Get)
                .route::<0, _>(get_metadata),
            get_webhook_message: d.build_handler(Method::Get).route(routes::webhook_message),
            patch_channel: d.build_handler(Method::Patch).route(routes::channel),
            patch_channel_message: d.build_handler(Method::Patch).route(routes::channel_message),
            patch_guild_member: d.build_handler(Method::Patch).route(routes::guild_member),
            patch_webhook_message: d.build_handler(Method::Patch).route(routes::webhook_message),
            post_channel_messages: d.build_handler(Method::Post).route(routes::channel_messages),
            post_channels: d.build_handler(Method::Post).route(routes::guild_channels),
            post_channel_webhooks: d.build_handler(Method::Post).route(routes::channel_webhooks),
            post_followup_webhook_message: d.build_handler(Method::Post).route(routes::webhook),
            post_thread_with_message: d.build_handler(Method::Post).route(routes::threads),
            post_webhook_message: d.build_handler(Method::Post).route(routes::webhook),
            put_guild_commands: d.build_handler(Method::Put).route::<1, _>(guild_commands),
            put_role_connection_metadata: d
                .build_handler(Method::Put)
                .route::<0, _>(put_metadata),
            put_thread_members: d.build_handler(Method::Put).route(routes::thread_members),
        }
    }

    /// Application id the client was configured with
    pub fn application_id(&self) -> &str {
        &self.application_id
    }
}
