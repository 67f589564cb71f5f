//! Links to Discord messages, channels and avatars

use crate::model::Message;

pub const CDN_BASE: &str = "https://cdn.discordapp.com";

/// Sizes the CDN serves avatars at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvatarSize(u16);

impl AvatarSize {
    pub const PX_16: Self = Self(16);
    pub const PX_32: Self = Self(32);
    pub const PX_64: Self = Self(64);
    pub const PX_128: Self = Self(128);
    pub const PX_256: Self = Self(256);
    pub const PX_512: Self = Self(512);
    pub const PX_1024: Self = Self(1024);
    pub const PX_2048: Self = Self(2048);
    pub const PX_4096: Self = Self(4096);

    /// Powers of two from 16 to 4096
    pub fn new(size: u16) -> Option<Self> {
        (size.is_power_of_two() && (16..=4096).contains(&size)).then_some(Self(size))
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

pub fn url_for_message(guild_id: &str, message: &Message) -> String {
    format!(
        "https://discord.com/channels/{guild_id}/{}/{}",
        message.channel_id, message.id
    )
}

pub fn url_for_channel(guild_id: &str, channel_id: &str) -> String {
    format!("https://discord.com/channels/{guild_id}/{channel_id}")
}

/// Guild-specific avatar of a member
pub fn avatar_url(guild_id: &str, user_id: &str, hash: &str, size: AvatarSize) -> String {
    format!(
        "{CDN_BASE}/guilds/{guild_id}/users/{user_id}/avatars/{hash}.png?size={}",
        size.get()
    )
}
