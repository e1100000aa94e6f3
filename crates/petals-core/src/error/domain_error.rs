//! Domain errors - precondition failures raised before any request

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Cannot edit message as it was not sent by client.")]
    NotMessageAuthor,

    #[error("Client identity is not known yet")]
    IdentityUnknown,

    // =========================================================================
    // Capability Errors
    // =========================================================================
    #[error("Not a news channel.")]
    NotAnnouncementChannel,
}

impl DomainError {
    /// Get a stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotMessageAuthor => "NOT_MESSAGE_AUTHOR",
            Self::IdentityUnknown => "IDENTITY_UNKNOWN",
            Self::NotAnnouncementChannel => "NOT_ANNOUNCEMENT_CHANNEL",
        }
    }

    /// Check if the failure is about who is calling
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotMessageAuthor | Self::IdentityUnknown)
    }

    /// Check if the failure is a violated precondition that no retry can fix
    pub fn is_precondition(&self) -> bool {
        self.is_authorization() || matches!(self, Self::NotAnnouncementChannel)
    }
}
