//! Platform-agnostic message reference.

/// Snapshot of an inbound chat message, detached from any SDK type.
///
/// The pipeline never touches concrete platform objects; everything it needs
/// from the triggering message is captured here at detection time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRef {
    /// Message id (unique key for the transform record).
    pub message_id: i64,
    /// Channel the message was posted in.
    pub channel_id: i64,
    /// Channel name, denormalized for reporting.
    pub channel_name: String,
    /// Guild the message was posted in.
    pub guild_id: i64,
    /// Message author.
    pub author_id: i64,
    /// Author account tag, denormalized for reporting.
    pub author_username: String,
    /// Author display name, used for webhook reposts.
    pub author_display_name: String,
    /// Author avatar URL, used for webhook reposts.
    pub author_avatar_url: Option<String>,
    /// Raw message text.
    pub content: String,
}
