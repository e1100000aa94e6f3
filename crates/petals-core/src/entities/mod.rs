//! Domain entities - typed views over gateway objects

mod attachment;
mod author;
mod channel;
mod embed;
mod emoji;
mod guild;
mod member;
mod message_type;
mod role;
mod user;

pub use attachment::Attachment;
pub use author::Author;
pub use channel::{Channel, ChannelKind};
pub use embed::{Embed, EmbedAuthor, EmbedField, EmbedFooter, EmbedMedia};
pub use emoji::{Emoji, EmojiRef};
pub use guild::Guild;
pub use member::GuildMember;
pub use message_type::MessageType;
pub use role::Role;
pub use user::User;
