//! Messaging gateway capability trait.

use async_trait::async_trait;
use embedfix_core::MessageRef;
use embedfix_error::GatewayResult;

/// The minimal chat-platform operation set the pipeline uses.
///
/// The pipeline never touches concrete platform types; `embedfix_bot`
/// provides the serenity-backed implementation and tests substitute mocks.
/// Every operation can fail with a permission-denied or generic error, which
/// the committer classifies via
/// [`GatewayError::is_permission_denied`](embedfix_error::GatewayError::is_permission_denied).
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Reply in-thread to a message without pinging the author.
    /// Returns the id of the sent reply.
    async fn reply(&self, channel_id: i64, message_id: i64, content: &str) -> GatewayResult<i64>;

    /// Suppress the link preview on a message.
    async fn suppress_embeds(&self, channel_id: i64, message_id: i64) -> GatewayResult<()>;

    /// Delete a message.
    async fn delete_message(&self, channel_id: i64, message_id: i64) -> GatewayResult<()>;

    /// Whether the channel supports webhooks (guild text channels do;
    /// threads and DMs do not).
    async fn channel_supports_webhooks(&self, channel_id: i64) -> GatewayResult<bool>;

    /// Repost `content` as the original author via a find-or-create
    /// webhook, using their display name and avatar. Returns the id of the
    /// webhook message.
    async fn repost_via_webhook(&self, message: &MessageRef, content: &str) -> GatewayResult<i64>;

    /// React to a message. `emoji` is a guild custom-emoji name, falling
    /// back to the glyph itself when no such emoji exists.
    async fn add_reaction(
        &self,
        channel_id: i64,
        message_id: i64,
        guild_id: i64,
        emoji: &str,
    ) -> GatewayResult<()>;

    /// Resolve a user id into a mention string, verifying the user exists.
    async fn user_mention(&self, user_id: i64) -> GatewayResult<String>;
}
