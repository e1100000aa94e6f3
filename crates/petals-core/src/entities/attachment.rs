//! Attachment value object

use crate::payloads::AttachmentPayload;
use crate::value_objects::Snowflake;

/// File attached to a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub id: Snowflake,
    pub filename: String,
    pub url: String,
    pub proxy_url: String,
    /// Size in bytes
    pub size: u64,
    pub content_type: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Attachment {
    /// Check if the attachment is an image (has dimensions)
    #[inline]
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }
}

impl From<&AttachmentPayload> for Attachment {
    fn from(payload: &AttachmentPayload) -> Self {
        Self {
            id: payload.id,
            filename: payload.filename.clone(),
            url: payload.url.clone(),
            proxy_url: payload.proxy_url.clone(),
            size: payload.size,
            content_type: payload.content_type.clone(),
            width: payload.width,
            height: payload.height,
        }
    }
}
