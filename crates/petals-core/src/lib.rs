//! # petals-core
//!
//! Domain layer containing ids, value objects, entities, wire payload shapes,
//! and collaborator traits.
//! This crate has no dependencies on infrastructure (sockets, HTTP, runtime).

pub mod entities;
pub mod error;
pub mod payloads;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Attachment, Author, Channel, ChannelKind, Embed, EmbedAuthor, EmbedField, EmbedFooter,
    EmbedMedia, Emoji, EmojiRef, Guild, GuildMember, MessageType, Role, User,
};
pub use error::{DomainError, RestError};
pub use payloads::{
    AttachmentPayload, ChannelPayload, EmbedPayload, EmojiPayload, GuildPayload, MemberPayload,
    MessagePayload, RolePayload, UserPayload,
};
pub use traits::{
    AllowedMentions, CreateMessage, EditMessage, MessageReference, ReactionQuery, RestClient,
    RestResult,
};
pub use value_objects::{
    FlagHandler, FlagTable, Permissions, Snowflake, SnowflakeParseError, MESSAGE_FLAGS,
    PERMISSION_FLAGS,
};
