//! Message type tags
//!
//! Codes outside this table are tolerated: new codes ship regularly, so an
//! unknown code yields `None` instead of an error.

use std::fmt;

/// Semantic message type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Default,
    RecipientAdd,
    RecipientRemove,
    Call,
    ChannelNameChange,
    ChannelIconChange,
    ChannelPinnedMessage,
    GuildMemberJoin,
    UserPremiumGuildSubscription,
    UserPremiumGuildSubscriptionTier1,
    UserPremiumGuildSubscriptionTier2,
    UserPremiumGuildSubscriptionTier3,
    ChannelFollowAdd,
    GuildDiscoveryDisqualified,
    GuildDiscoveryRequalified,
    Reply,
    ApplicationCommand,
}

impl MessageType {
    /// Map a wire type code
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        let kind = match code {
            0 => Self::Default,
            1 => Self::RecipientAdd,
            2 => Self::RecipientRemove,
            3 => Self::Call,
            4 => Self::ChannelNameChange,
            5 => Self::ChannelIconChange,
            6 => Self::ChannelPinnedMessage,
            7 => Self::GuildMemberJoin,
            8 => Self::UserPremiumGuildSubscription,
            9 => Self::UserPremiumGuildSubscriptionTier1,
            10 => Self::UserPremiumGuildSubscriptionTier2,
            11 => Self::UserPremiumGuildSubscriptionTier3,
            12 => Self::ChannelFollowAdd,
            14 => Self::GuildDiscoveryDisqualified,
            15 => Self::GuildDiscoveryRequalified,
            19 => Self::Reply,
            20 => Self::ApplicationCommand,
            _ => return None,
        };
        Some(kind)
    }

    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Default => 0,
            Self::RecipientAdd => 1,
            Self::RecipientRemove => 2,
            Self::Call => 3,
            Self::ChannelNameChange => 4,
            Self::ChannelIconChange => 5,
            Self::ChannelPinnedMessage => 6,
            Self::GuildMemberJoin => 7,
            Self::UserPremiumGuildSubscription => 8,
            Self::UserPremiumGuildSubscriptionTier1 => 9,
            Self::UserPremiumGuildSubscriptionTier2 => 10,
            Self::UserPremiumGuildSubscriptionTier3 => 11,
            Self::ChannelFollowAdd => 12,
            Self::GuildDiscoveryDisqualified => 14,
            Self::GuildDiscoveryRequalified => 15,
            Self::Reply => 19,
            Self::ApplicationCommand => 20,
        }
    }

    /// Upper snake case tag
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::RecipientAdd => "RECIPIENT_ADD",
            Self::RecipientRemove => "RECIPIENT_REMOVE",
            Self::Call => "CALL",
            Self::ChannelNameChange => "CHANNEL_NAME_CHANGE",
            Self::ChannelIconChange => "CHANNEL_ICON_CHANGE",
            Self::ChannelPinnedMessage => "CHANNEL_PINNED_MESSAGE",
            Self::GuildMemberJoin => "GUILD_MEMBER_JOIN",
            Self::UserPremiumGuildSubscription => "USER_PREMIUM_GUILD_SUBSCRIPTION",
            Self::UserPremiumGuildSubscriptionTier1 => "USER_PREMIUM_GUILD_SUBSCRIPTION_TIER_1",
            Self::UserPremiumGuildSubscriptionTier2 => "USER_PREMIUM_GUILD_SUBSCRIPTION_TIER_2",
            Self::UserPremiumGuildSubscriptionTier3 => "USER_PREMIUM_GUILD_SUBSCRIPTION_TIER_3",
            Self::ChannelFollowAdd => "CHANNEL_FOLLOW_ADD",
            Self::GuildDiscoveryDisqualified => "GUILD_DISCOVERY_DISQUALIFIED",
            Self::GuildDiscoveryRequalified => "GUILD_DISCOVERY_REQUALIFIED",
            Self::Reply => "REPLY",
            Self::ApplicationCommand => "APPLICATION_COMMAND",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
