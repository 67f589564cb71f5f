//! Discord v10 route fragments
//!
//! Each function takes its path parameters as a fixed-size array so it can
//! be handed straight to [`HandlerBuilder::route`](crate::dispatch::HandlerBuilder::route).
//! Parameters are inserted as given; `@me` and `@original` are valid where
//! Discord accepts them.

/// `/channels/{channel}`
pub fn channel([channel_id]: [&str; 1]) -> String {
    format!("/channels/{channel_id}")
}

/// `/channels/{channel}/messages`
pub fn channel_messages([channel_id]: [&str; 1]) -> String {
    format!("/channels/{channel_id}/messages")
}

/// `/channels/{channel}/messages/{message}`
pub fn channel_message([channel_id, message_id]: [&str; 2]) -> String {
    format!("/channels/{channel_id}/messages/{message_id}")
}

/// `/channels/{channel}/webhooks`
pub fn channel_webhooks([channel_id]: [&str; 1]) -> String {
    format!("/channels/{channel_id}/webhooks")
}

/// `/channels/{channel}/messages/{message}/threads`
pub fn threads([channel_id, message_id]: [&str; 2]) -> String {
    format!("/channels/{channel_id}/messages/{message_id}/threads")
}

/// `/channels/{thread}/thread-members/{user}`
pub fn thread_members([thread_id, user_id]: [&str; 2]) -> String {
    format!("/channels/{thread_id}/thread-members/{user_id}")
}

/// `/webhooks/{webhook}/{token}`
pub fn webhook([webhook_id, webhook_token]: [&str; 2]) -> String {
    format!("/webhooks/{webhook_id}/{webhook_token}")
}

/// `/webhooks/{webhook}/{token}/messages/{message}`
pub fn webhook_message([webhook_id, webhook_token, message_id]: [&str; 3]) -> String {
    format!("/webhooks/{webhook_id}/{webhook_token}/messages/{message_id}")
}

/// `/guilds/{guild}`
pub fn guild([guild_id]: [&str; 1]) -> String {
    format!("/guilds/{guild_id}")
}

/// `/guilds/{guild}/channels`
pub fn guild_channels([guild_id]: [&str; 1]) -> String {
    format!("/guilds/{guild_id}/channels")
}

/// `/guilds/{guild}/members/{user}`
pub fn guild_member([guild_id, user_id]: [&str; 2]) -> String {
    format!("/guilds/{guild_id}/members/{user_id}")
}

/// `/guilds/{guild}/members`
pub fn guild_members([guild_id]: [&str; 1]) -> String {
    format!("/guilds/{guild_id}/members")
}

/// `/users/{user}`
pub fn user([user_id]: [&str; 1]) -> String {
    format!("/users/{user_id}")
}

/// `/users/@me/guilds`
pub fn user_guilds([]: [&str; 0]) -> String {
    "/users/@me/guilds".to_string()
}

/// `/applications/{application}/guilds/{guild}/commands`
pub fn application_guild_commands([application_id, guild_id]: [&str; 2]) -> String {
    format!("/applications/{application_id}/guilds/{guild_id}/commands")
}

/// `/applications/{application}/role-connections/metadata`
pub fn application_role_connection_metadata([application_id]: [&str; 1]) -> String {
    format!("/applications/{application_id}/role-connections/metadata")
}
