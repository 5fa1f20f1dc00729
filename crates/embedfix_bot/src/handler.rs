//! Serenity event handler feeding the rewrite pipelines.

use embedfix_core::MessageRef;
use embedfix_database::EmbedRepository;
use embedfix_pipeline::{ReplyNotifier, RewritePipeline, ValidationQueue};
use embedfix_settings::SettingsClient;
use serenity::async_trait;
use serenity::client::{Context, EventHandler};
use serenity::model::channel::Message;
use serenity::model::gateway::{GatewayIntents, Ready};
use serenity::model::guild::Guild;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Event handler for the embedfix Discord bot.
///
/// Routes every inbound guild message through the webhook reply notifier
/// and each platform pipeline's detection step. Heavy work never happens
/// here: detection only enqueues, and the per-platform workers drain the
/// queues on their own tasks.
pub struct EmbedfixHandler {
    pipelines: Vec<(Arc<RewritePipeline>, ValidationQueue)>,
    notifier: Arc<ReplyNotifier>,
    repository: Arc<EmbedRepository>,
    settings: Arc<SettingsClient>,
}

impl EmbedfixHandler {
    /// Create a handler over the platform pipelines and their queues.
    pub fn new(
        pipelines: Vec<(Arc<RewritePipeline>, ValidationQueue)>,
        notifier: Arc<ReplyNotifier>,
        repository: Arc<EmbedRepository>,
        settings: Arc<SettingsClient>,
    ) -> Self {
        Self {
            pipelines,
            notifier,
            repository,
            settings,
        }
    }

    /// Required gateway intents for the bot.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
    }
}

#[async_trait]
impl EventHandler for EmbedfixHandler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let Some(guild_id) = msg.guild_id else {
            return;
        };

        let channel_name = msg
            .channel_id
            .name(&ctx)
            .await
            .unwrap_or_else(|_| "unknown-channel".to_string());
        let message = MessageRef {
            message_id: msg.id.get() as i64,
            channel_id: msg.channel_id.get() as i64,
            channel_name,
            guild_id: guild_id.get() as i64,
            author_id: msg.author.id.get() as i64,
            author_username: msg.author.tag(),
            author_display_name: msg
                .author
                .global_name
                .clone()
                .unwrap_or_else(|| msg.author.name.clone()),
            author_avatar_url: msg.author.avatar_url(),
            content: msg.content.clone(),
        };

        if let Some(referenced) = msg.message_reference.as_ref().and_then(|r| r.message_id) {
            self.notifier
                .handle_reply(&message, referenced.get() as i64)
                .await;
        }

        for (pipeline, queue) in &self.pipelines {
            if let Err(e) = pipeline.inspect(&message, queue).await {
                error!(
                    platform = %pipeline.platform(),
                    message_id = message.message_id,
                    error = %e,
                    "Failed to inspect message"
                );
            }
        }
    }

    async fn guild_create(&self, _ctx: Context, guild: Guild, is_new: Option<bool>) {
        let guild_id = guild.id.get() as i64;
        if is_new == Some(true) {
            info!(guild_id, guild_name = %guild.name, "Joined guild");
            if let Err(e) = self.repository.ensure_pruning_config(guild_id).await {
                warn!(guild_id, error = %e, "Failed to seed pruning config");
            }
        }

        // Fires once per guild at startup too, which doubles as the
        // retention sweep.
        let settings = self.settings.get(guild_id).await;
        if settings.pruning_enabled {
            match self
                .repository
                .prune_message_data(guild_id, settings.pruning_max_days)
                .await
            {
                Ok(0) => {}
                Ok(deleted) => info!(guild_id, deleted, "Pruned expired transform records"),
                Err(e) => warn!(guild_id, error = %e, "Failed to prune transform records"),
            }
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, guilds = ready.guilds.len(), "Connected to Discord");
    }
}
