//! Serenity-backed messaging gateway.

use async_trait::async_trait;
use embedfix_core::MessageRef;
use embedfix_error::{GatewayError, GatewayErrorKind, GatewayResult};
use embedfix_pipeline::MessagingGateway;
use serenity::builder::{
    CreateAllowedMentions, CreateMessage, CreateWebhook, EditMessage, ExecuteWebhook,
};
use serenity::http::Http;
use serenity::model::channel::{Channel, ChannelType, ReactionType};
use serenity::model::id::{ChannelId, GuildId, MessageId, UserId};
use serenity::model::webhook::Webhook;
use std::sync::Arc;
use tracing::debug;

/// Name under which the bot's repost webhook is created per channel.
const WEBHOOK_NAME: &str = "embedfix";

/// Messaging gateway over the serenity HTTP client.
///
/// Stateless beyond the shared [`Http`] handle; one instance serves both
/// platform pipelines.
pub struct SerenityGateway {
    http: Arc<Http>,
}

impl SerenityGateway {
    /// Create a gateway over a serenity HTTP handle.
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    /// Find the bot's repost webhook in a channel, creating it on first use.
    async fn repost_webhook(&self, channel_id: ChannelId) -> GatewayResult<Webhook> {
        let webhooks = channel_id.webhooks(&self.http).await?;
        if let Some(webhook) = webhooks
            .into_iter()
            .find(|w| w.name.as_deref() == Some(WEBHOOK_NAME))
        {
            return Ok(webhook);
        }
        debug!(channel_id = %channel_id, "Creating repost webhook");
        Ok(channel_id
            .create_webhook(&self.http, CreateWebhook::new(WEBHOOK_NAME))
            .await?)
    }

    /// Resolve a reaction emoji: guild custom emoji by name first, then the
    /// string itself as a unicode glyph, then the stock glyph for names that
    /// clearly aren't unicode emoji.
    async fn resolve_emoji(&self, guild_id: GuildId, emoji: &str) -> ReactionType {
        match guild_id.emojis(&self.http).await {
            Ok(emojis) => {
                if let Some(custom) = emojis.into_iter().find(|e| e.name == emoji) {
                    return ReactionType::from(custom);
                }
            }
            Err(e) => debug!(guild_id = %guild_id, error = %e, "Could not list guild emojis"),
        }
        if emoji.chars().any(|c| c.is_ascii_alphanumeric()) {
            // A custom-emoji name the guild doesn't have.
            ReactionType::Unicode("🙏".to_string())
        } else {
            ReactionType::Unicode(emoji.to_string())
        }
    }
}

#[async_trait]
impl MessagingGateway for SerenityGateway {
    async fn reply(&self, channel_id: i64, message_id: i64, content: &str) -> GatewayResult<i64> {
        let channel = ChannelId::new(channel_id as u64);
        let builder = CreateMessage::new()
            .content(content)
            .reference_message((channel, MessageId::new(message_id as u64)))
            .allowed_mentions(CreateAllowedMentions::new().all_users(true).replied_user(false));
        let sent = channel.send_message(&self.http, builder).await?;
        Ok(sent.id.get() as i64)
    }

    async fn suppress_embeds(&self, channel_id: i64, message_id: i64) -> GatewayResult<()> {
        ChannelId::new(channel_id as u64)
            .edit_message(
                &self.http,
                MessageId::new(message_id as u64),
                EditMessage::new().suppress_embeds(true),
            )
            .await?;
        Ok(())
    }

    async fn delete_message(&self, channel_id: i64, message_id: i64) -> GatewayResult<()> {
        ChannelId::new(channel_id as u64)
            .delete_message(&self.http, MessageId::new(message_id as u64))
            .await?;
        Ok(())
    }

    async fn channel_supports_webhooks(&self, channel_id: i64) -> GatewayResult<bool> {
        let channel = ChannelId::new(channel_id as u64).to_channel(&self.http).await?;
        // Threads and DMs can't own webhooks.
        Ok(match channel {
            Channel::Guild(guild_channel) => {
                matches!(guild_channel.kind, ChannelType::Text | ChannelType::News)
            }
            _ => false,
        })
    }

    async fn repost_via_webhook(&self, message: &MessageRef, content: &str) -> GatewayResult<i64> {
        let channel = ChannelId::new(message.channel_id as u64);
        let webhook = self.repost_webhook(channel).await?;

        let mut builder = ExecuteWebhook::new()
            .content(content)
            .username(&message.author_display_name);
        if let Some(avatar_url) = &message.author_avatar_url {
            builder = builder.avatar_url(avatar_url);
        }

        let sent = webhook
            .execute(&self.http, true, builder)
            .await?
            .ok_or_else(|| {
                GatewayError::new(GatewayErrorKind::SendFailed(
                    "webhook execution returned no message".to_string(),
                ))
            })?;
        Ok(sent.id.get() as i64)
    }

    async fn add_reaction(
        &self,
        channel_id: i64,
        message_id: i64,
        guild_id: i64,
        emoji: &str,
    ) -> GatewayResult<()> {
        let reaction = self.resolve_emoji(GuildId::new(guild_id as u64), emoji).await;
        ChannelId::new(channel_id as u64)
            .create_reaction(&self.http, MessageId::new(message_id as u64), reaction)
            .await?;
        Ok(())
    }

    async fn user_mention(&self, user_id: i64) -> GatewayResult<String> {
        let user = self.http.get_user(UserId::new(user_id as u64)).await?;
        Ok(format!("<@{}>", user.id.get()))
    }
}
