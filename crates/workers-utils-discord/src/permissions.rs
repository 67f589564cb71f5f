//! Guild permission checks

use crate::model::GuildMember;

/// Discord permission flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Permission {
    CreateInstantInvite,
    KickMembers,
    BanMembers,
    Administrator,
    ManageChannels,
    ManageGuild,
    AddReactions,
    ViewAuditLog,
    PrioritySpeaker,
    Stream,
    ViewChannel,
    SendMessages,
    SendTtsMessages,
    ManageMessages,
    EmbedLinks,
    AttachFiles,
    ReadMessageHistory,
    MentionEveryone,
    UseExternalEmojis,
    ViewGuildInsights,
    Connect,
    Speak,
    MuteMembers,
    DeafenMembers,
    MoveMembers,
    UseVad,
    ChangeNickname,
    ManageNicknames,
    ManageRoles,
    ManageWebhooks,
    ManageGuildExpressions,
    UseApplicationCommands,
    RequestToSpeak,
    ManageEvents,
    ManageThreads,
    CreatePublicThreads,
    CreatePrivateThreads,
    UseExternalStickers,
    SendMessagesInThreads,
    UseEmbeddedActivities,
    ModerateMembers,
    ViewCreatorMonetizationAnalytics,
    UseSoundboard,
    CreateGuildExpressions,
    CreateEvents,
    UseExternalSounds,
    SendVoiceMessages,
    SendPolls,
    UseExternalApps,
}

impl Permission {
    pub fn bit(self) -> u128 {
        let shift = match self {
            Self::CreateInstantInvite => 0,
            Self::KickMembers => 1,
            Self::BanMembers => 2,
            Self::Administrator => 3,
            Self::ManageChannels => 4,
            Self::ManageGuild => 5,
            Self::AddReactions => 6,
            Self::ViewAuditLog => 7,
            Self::PrioritySpeaker => 8,
            Self::Stream => 9,
            Self::ViewChannel => 10,
            Self::SendMessages => 11,
            Self::SendTtsMessages => 12,
            Self::ManageMessages => 13,
            Self::EmbedLinks => 14,
            Self::AttachFiles => 15,
            Self::ReadMessageHistory => 16,
            Self::MentionEveryone => 17,
            Self::UseExternalEmojis => 18,
            Self::ViewGuildInsights => 19,
            Self::Connect => 20,
            Self::Speak => 21,
            Self::MuteMembers => 22,
            Self::DeafenMembers => 23,
            Self::MoveMembers => 24,
            Self::UseVad => 25,
            Self::ChangeNickname => 26,
            Self::ManageNicknames => 27,
            Self::ManageRoles => 28,
            Self::ManageWebhooks => 29,
            Self::ManageGuildExpressions => 30,
            Self::UseApplicationCommands => 31,
            Self::RequestToSpeak => 32,
            Self::ManageEvents => 33,
            Self::ManageThreads => 34,
            Self::CreatePublicThreads => 35,
            Self::CreatePrivateThreads => 36,
            Self::UseExternalStickers => 37,
            Self::SendMessagesInThreads => 38,
            Self::UseEmbeddedActivities => 39,
            Self::ModerateMembers => 40,
            Self::ViewCreatorMonetizationAnalytics => 41,
            Self::UseSoundboard => 42,
            Self::CreateGuildExpressions => 43,
            Self::CreateEvents => 44,
            Self::UseExternalSounds => 45,
            Self::SendVoiceMessages => 46,
            Self::SendPolls => 49,
            Self::UseExternalApps => 50,
        };
        1 << shift
    }
}

/// Whether `member` holds at least one of `permissions`
///
/// Only interaction payloads carry the computed permission string. A member
/// without one, or with one that does not parse, has no permissions.
pub fn member_has_permissions(member: &GuildMember, permissions: &[Permission]) -> bool {
    let Some(raw) = member.permissions.as_deref() else {
        return false;
    };
    let granted = match raw.parse::<u128>() {
        Ok(granted) => granted,
        Err(err) => {
            tracing::warn!(permissions = raw, error = %err, "Unparseable member permissions");
            return false;
        }
    };

    permissions
        .iter()
        .any(|permission| granted & permission.bit() == permission.bit())
}
