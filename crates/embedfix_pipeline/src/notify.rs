//! Reply notifications for webhook-reposted messages.
//!
//! A webhook repost is authored by the webhook, so a plain reply to it never
//! pings the human who posted the original link. The notifier closes that
//! gap: when an inbound message replies to a tracked webhook repost, it tags
//! the original author under the reply.

use crate::{MessagingGateway, TransformStore};
use embedfix_core::MessageRef;
use embedfix_settings::SettingsClient;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Notifies original authors when someone replies to their webhook repost.
pub struct ReplyNotifier {
    gateway: Arc<dyn MessagingGateway>,
    store: Arc<dyn TransformStore>,
    settings: Arc<SettingsClient>,
}

impl ReplyNotifier {
    /// Assemble a notifier from its capabilities.
    pub fn new(
        gateway: Arc<dyn MessagingGateway>,
        store: Arc<dyn TransformStore>,
        settings: Arc<SettingsClient>,
    ) -> Self {
        Self {
            gateway,
            store,
            settings,
        }
    }

    /// Handle a message that replies to `referenced_message_id`.
    ///
    /// Every outcome here is best-effort: lookup misses, disabled settings,
    /// and send failures are logged and swallowed, never surfaced to the
    /// user.
    #[instrument(skip(self, message), fields(message_id = message.message_id, referenced_message_id))]
    pub async fn handle_reply(&self, message: &MessageRef, referenced_message_id: i64) {
        let original_user_id = match self
            .store
            .original_user_for_webhook(referenced_message_id)
            .await
        {
            Ok(Some(user_id)) => user_id,
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, "Failed to look up webhook message author");
                return;
            }
        };

        let settings = self.settings.get(message.guild_id).await;
        if !settings.webhook_reply_notifications {
            info!(
                server_id = message.guild_id,
                "Webhook reply notifications disabled for guild, skipping"
            );
            return;
        }
        if message.author_id == original_user_id && !settings.notify_self_replies {
            info!(
                user_id = message.author_id,
                "User replied to their own webhook message, skipping notification"
            );
            return;
        }

        let mention = match self.gateway.user_mention(original_user_id).await {
            Ok(mention) => mention,
            Err(e) => {
                warn!(user_id = original_user_id, error = %e, "Could not resolve user for reply notification");
                return;
            }
        };
        match self
            .gateway
            .reply(message.channel_id, message.message_id, &mention)
            .await
        {
            Ok(_) => info!(
                user_id = original_user_id,
                replier_id = message.author_id,
                "Notified original author about reply"
            ),
            Err(e) => warn!(user_id = original_user_id, error = %e, "Failed to send reply notification"),
        }
    }
}
