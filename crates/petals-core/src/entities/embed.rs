//! Embed value objects - rich content blocks attached to a message

use chrono::{DateTime, Utc};

use crate::payloads::{
    EmbedAuthorPayload, EmbedFieldPayload, EmbedFooterPayload, EmbedMediaPayload, EmbedPayload,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedFooter {
    pub text: String,
    pub icon_url: Option<String>,
}

/// Image, thumbnail, or video of an embed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedMedia {
    pub url: Option<String>,
    pub proxy_url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedAuthor {
    pub name: Option<String>,
    pub url: Option<String>,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Embed value object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Embed {
    pub title: Option<String>,
    pub kind: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub color: Option<u32>,
    pub footer: Option<EmbedFooter>,
    pub image: Option<EmbedMedia>,
    pub thumbnail: Option<EmbedMedia>,
    pub video: Option<EmbedMedia>,
    pub author: Option<EmbedAuthor>,
    pub fields: Vec<EmbedField>,
}

impl Embed {
    /// Convert back to the wire shape, e.g. for an edit request
    #[must_use]
    pub fn to_payload(&self) -> EmbedPayload {
        EmbedPayload {
            title: self.title.clone(),
            kind: self.kind.clone(),
            description: self.description.clone(),
            url: self.url.clone(),
            timestamp: self.timestamp.map(|ts| ts.to_rfc3339()),
            color: self.color,
            footer: self.footer.as_ref().map(|f| EmbedFooterPayload {
                text: f.text.clone(),
                icon_url: f.icon_url.clone(),
            }),
            image: self.image.as_ref().map(EmbedMedia::to_payload),
            thumbnail: self.thumbnail.as_ref().map(EmbedMedia::to_payload),
            video: self.video.as_ref().map(EmbedMedia::to_payload),
            author: self.author.as_ref().map(|a| EmbedAuthorPayload {
                name: a.name.clone(),
                url: a.url.clone(),
                icon_url: a.icon_url.clone(),
            }),
            fields: self
                .fields
                .iter()
                .map(|f| EmbedFieldPayload {
                    name: f.name.clone(),
                    value: f.value.clone(),
                    inline: f.inline,
                })
                .collect(),
        }
    }
}

impl EmbedMedia {
    fn to_payload(&self) -> EmbedMediaPayload {
        EmbedMediaPayload {
            url: self.url.clone(),
            proxy_url: self.proxy_url.clone(),
            width: self.width,
            height: self.height,
        }
    }
}

impl From<&EmbedMediaPayload> for EmbedMedia {
    fn from(payload: &EmbedMediaPayload) -> Self {
        Self {
            url: payload.url.clone(),
            proxy_url: payload.proxy_url.clone(),
            width: payload.width,
            height: payload.height,
        }
    }
}

impl From<&EmbedPayload> for Embed {
    fn from(payload: &EmbedPayload) -> Self {
        Self {
            title: payload.title.clone(),
            kind: payload.kind.clone(),
            description: payload.description.clone(),
            url: payload.url.clone(),
            // Malformed timestamps are dropped rather than failing the message
            timestamp: payload
                .timestamp
                .as_deref()
                .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
                .map(|ts| ts.with_timezone(&Utc)),
            color: payload.color,
            footer: payload.footer.as_ref().map(|f| EmbedFooter {
                text: f.text.clone(),
                icon_url: f.icon_url.clone(),
            }),
            image: payload.image.as_ref().map(EmbedMedia::from),
            thumbnail: payload.thumbnail.as_ref().map(EmbedMedia::from),
            video: payload.video.as_ref().map(EmbedMedia::from),
            author: payload.author.as_ref().map(|a| EmbedAuthor {
                name: a.name.clone(),
                url: a.url.clone(),
                icon_url: a.icon_url.clone(),
            }),
            fields: payload
                .fields
                .iter()
                .map(|f| EmbedField {
                    name: f.name.clone(),
                    value: f.value.clone(),
                    inline: f.inline,
                })
                .collect(),
        }
    }
}
