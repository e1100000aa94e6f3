//! Emoji value objects
//!
//! `Emoji` is the transcribed wire object; `EmojiRef` is what reaction routes take.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;

use crate::payloads::EmojiPayload;
use crate::value_objects::Snowflake;

/// RFC 3986 unreserved characters pass through untouched
const ROUTE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Emoji value object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emoji {
    /// `None` for unicode emoji
    pub id: Option<Snowflake>,
    pub name: Option<String>,
    pub animated: bool,
    pub roles: Vec<Snowflake>,
}

impl Emoji {
    /// Reference usable in reaction routes, if the emoji has enough data
    #[must_use]
    pub fn to_ref(&self) -> Option<EmojiRef> {
        match (self.id, self.name.as_ref()) {
            (Some(id), Some(name)) => Some(EmojiRef::Custom {
                name: name.clone(),
                id,
            }),
            (None, Some(name)) => Some(EmojiRef::Unicode(name.clone())),
            _ => None,
        }
    }
}

impl From<&EmojiPayload> for Emoji {
    fn from(payload: &EmojiPayload) -> Self {
        Self {
            id: payload.id,
            name: payload.name.clone(),
            animated: payload.animated,
            roles: payload.roles.clone(),
        }
    }
}

/// Emoji as addressed by the reaction endpoints
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EmojiRef {
    Unicode(String),
    Custom { name: String, id: Snowflake },
}

impl EmojiRef {
    /// Percent-encoded path segment
    #[must_use]
    pub fn route_segment(&self) -> String {
        utf8_percent_encode(&self.to_string(), ROUTE_ENCODE_SET).to_string()
    }
}

impl fmt::Display for EmojiRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unicode(value) => f.write_str(value),
            Self::Custom { name, id } => write!(f, "{name}:{id}"),
        }
    }
}

impl From<&str> for EmojiRef {
    /// `name:id` (or the `<:name:id>` mention form) is a custom emoji;
    /// anything else is taken as unicode
    fn from(value: &str) -> Self {
        let trimmed = value.trim_start_matches('<').trim_end_matches('>');
        if let Some((name, id)) = trimmed.rsplit_once(':') {
            if let Ok(id) = Snowflake::parse(id) {
                let name = name.strip_prefix("a:").unwrap_or(name).trim_start_matches(':');
                return Self::Custom {
                    name: name.to_string(),
                    id,
                };
            }
        }
        Self::Unicode(value.to_string())
    }
}

impl From<String> for EmojiRef {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}
