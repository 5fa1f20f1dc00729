//! The rewrite pipeline: detection, candidate probing, and outcome commit.

use crate::{
    AuditEvent, MessagingGateway, PlatformSpec, ProbeOutcome, RestrictionVerdict, TransformRecord,
    TransformStore, UrlProber, ValidationQueue, ValidationQueueItem,
};
use embedfix_cache::TtlCache;
use embedfix_core::{
    Candidate, GuildEmbedSettings, MessageRef, Platform, ValidationStatus, candidates, detect_url,
    is_already_embedded,
};
use embedfix_error::EmbedfixResult;
use embedfix_settings::SettingsClient;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Freshness window for the memoized feature-id lookup.
const FEATURE_ID_TTL: Duration = Duration::from_secs(15 * 60);

/// How a validated candidate was (or was not) committed.
enum CommitOutcome {
    /// Side effect performed; record the success.
    Committed {
        webhook_message_id: Option<i64>,
        via_webhook: bool,
    },
    /// Side effects failed terminally; stop trying candidates.
    Abandoned(String),
}

/// One platform's URL-rewrite pipeline.
///
/// Holds the capability handles (gateway, store, prober, settings) and the
/// per-platform parameterization. Detection runs on every inbound message
/// via [`inspect`](Self::inspect); queued items are drained one at a time by
/// the worker calling [`process_item`](Self::process_item).
pub struct RewritePipeline {
    spec: PlatformSpec,
    gateway: Arc<dyn MessagingGateway>,
    store: Arc<dyn TransformStore>,
    prober: Arc<dyn UrlProber>,
    settings: Arc<SettingsClient>,
    feature_ids: Mutex<TtlCache<&'static str, Uuid>>,
}

impl RewritePipeline {
    /// Assemble a pipeline from its capabilities.
    pub fn new(
        spec: PlatformSpec,
        gateway: Arc<dyn MessagingGateway>,
        store: Arc<dyn TransformStore>,
        prober: Arc<dyn UrlProber>,
        settings: Arc<SettingsClient>,
    ) -> Self {
        Self {
            spec,
            gateway,
            store,
            prober,
            settings,
            feature_ids: Mutex::new(TtlCache::new(FEATURE_ID_TTL)),
        }
    }

    /// The platform this pipeline serves.
    pub fn platform(&self) -> Platform {
        self.spec.platform
    }

    /// Inspect an inbound message: detect a platform URL and either react
    /// to an already-rewritten link or enqueue a validation job.
    ///
    /// Always upserts the author and channel name records, URL or not.
    #[instrument(skip(self, message, queue), fields(platform = %self.spec.platform, message_id = message.message_id))]
    pub async fn inspect(
        &self,
        message: &MessageRef,
        queue: &ValidationQueue,
    ) -> EmbedfixResult<()> {
        if let Err(e) = self
            .store
            .upsert_user(message.author_id, &message.author_username)
            .await
        {
            warn!(error = %e, "Failed to upsert user info");
        }
        if let Err(e) = self
            .store
            .upsert_channel(message.channel_id, &message.channel_name)
            .await
        {
            warn!(error = %e, "Failed to upsert channel info");
        }

        let Some(detected) = detect_url(self.spec.platform, &message.content) else {
            return Ok(());
        };

        self.audit(AuditEvent {
            server_id: message.guild_id,
            user_id: message.author_id,
            action: "url_detected",
            target_type: "message",
            target_id: message.message_id.to_string(),
            details: json!({
                "original_url": detected.url,
                "message_id": message.message_id,
            }),
        })
        .await;

        let Some(feature_id) = self.feature_id().await? else {
            warn!(
                feature = self.spec.platform.feature_name(),
                "Feature id not found; skipping embed processing"
            );
            return Ok(());
        };
        let configs = self.store.embed_configs(message.guild_id, feature_id).await?;

        if is_already_embedded(self.spec.platform, &detected.url, &configs) {
            let settings = self.settings.get(message.guild_id).await;
            if settings.reaction_enabled {
                if let Err(e) = self
                    .gateway
                    .add_reaction(
                        message.channel_id,
                        message.message_id,
                        message.guild_id,
                        &settings.reaction_emoji,
                    )
                    .await
                {
                    warn!(error = %e, "Failed to react to already-embedded URL");
                } else {
                    info!(url = detected.url, emoji = settings.reaction_emoji, "Reacted to already-embedded URL");
                }
            }
            self.audit(AuditEvent {
                server_id: message.guild_id,
                user_id: message.author_id,
                action: "already_embedded",
                target_type: "message",
                target_id: message.message_id.to_string(),
                details: json!({
                    "original_url": detected.url,
                    "message_id": message.message_id,
                }),
            })
            .await;
            return Ok(());
        }

        let queued = queue.enqueue(ValidationQueueItem {
            message: message.clone(),
            original_url: detected.url,
            post_id: detected.post_id,
        });
        if !queued {
            info!("Dropped duplicate URL from validation queue");
        }
        Ok(())
    }

    /// Run one queued item to its terminal outcome.
    ///
    /// Known gap: when the guild has no active embed configs the item is
    /// dropped without a persisted record, so opted-out guilds do not
    /// accumulate phantom failure rows.
    #[instrument(skip(self, item), fields(platform = %self.spec.platform, message_id = item.message.message_id))]
    pub async fn process_item(&self, item: &ValidationQueueItem) -> EmbedfixResult<()> {
        let message = &item.message;
        let settings = self.settings.get(message.guild_id).await;

        let Some(feature_id) = self.feature_id().await? else {
            warn!(
                feature = self.spec.platform.feature_name(),
                "Feature id not found; cannot fetch embed configs"
            );
            return Ok(());
        };
        let configs = self.store.embed_configs(message.guild_id, feature_id).await?;
        if configs.is_empty() {
            warn!(server_id = message.guild_id, "No embed configs found for server");
            return Ok(());
        }

        if let Some(gate) = &self.spec.gate {
            if gate.check(&item.original_url).await == RestrictionVerdict::Restricted {
                return self.commit_restricted(item, &settings).await;
            }
        }

        let mut last_error: Option<String> = None;
        for candidate in candidates(self.spec.platform, &item.original_url, &configs) {
            info!(prefix = candidate.prefix, url = item.original_url, "Trying candidate");
            match self.prober.probe(&candidate.url).await {
                ProbeOutcome::Unreachable(error) => {
                    warn!(prefix = candidate.prefix, error, "Candidate failed validation");
                    last_error = Some(error);
                }
                ProbeOutcome::Reachable => {
                    match self.commit_success(item, &settings, &candidate).await {
                        CommitOutcome::Committed {
                            webhook_message_id,
                            via_webhook,
                        } => {
                            return self
                                .record_success(item, &candidate, webhook_message_id, via_webhook)
                                .await;
                        }
                        CommitOutcome::Abandoned(reason) => {
                            error!(reason, "Abandoning message after side-effect failure");
                            return self.commit_failure(item, &settings, reason).await;
                        }
                    }
                }
            }
        }

        let error =
            last_error.unwrap_or_else(|| "All embed prefixes failed validation".to_string());
        self.commit_failure(item, &settings, error).await
    }

    /// Perform the platform side effect for the first validated candidate.
    async fn commit_success(
        &self,
        item: &ValidationQueueItem,
        settings: &GuildEmbedSettings,
        candidate: &Candidate,
    ) -> CommitOutcome {
        let message = &item.message;

        if settings.webhook_repost_enabled {
            match self.gateway.channel_supports_webhooks(message.channel_id).await {
                Ok(true) => match self.webhook_repost(message, &candidate.url).await {
                    Ok(webhook_message_id) => {
                        return CommitOutcome::Committed {
                            webhook_message_id: Some(webhook_message_id),
                            via_webhook: true,
                        };
                    }
                    // Fall back to suppress+reply for the same candidate
                    // rather than failing the message.
                    Err(e) => error!(error = %e, "Error reposting with webhook, falling back"),
                },
                Ok(false) => {
                    info!(channel_id = message.channel_id, "Channel does not support webhooks");
                }
                Err(e) => warn!(error = %e, "Could not determine webhook support, using reply mode"),
            }
        }

        if settings.suppress_original_embed {
            if let Err(e) = self
                .gateway
                .suppress_embeds(message.channel_id, message.message_id)
                .await
            {
                warn!(error = %e, "Failed to suppress original embed");
            }
        }

        let content = if self.spec.reply_with_full_content {
            message.content.replace(&item.original_url, &candidate.url)
        } else {
            candidate.url.clone()
        };

        match self
            .gateway
            .reply(message.channel_id, message.message_id, &content)
            .await
        {
            Ok(_) => CommitOutcome::Committed {
                webhook_message_id: None,
                via_webhook: false,
            },
            Err(e) if e.is_permission_denied() => {
                error!(
                    channel_id = message.channel_id,
                    error = %e,
                    "Missing permissions to reply, retrying once"
                );
                // Permission failures are unlikely to be transient: one
                // best-effort retry, then give up on this message.
                match self
                    .gateway
                    .reply(message.channel_id, message.message_id, &content)
                    .await
                {
                    Ok(_) => CommitOutcome::Committed {
                        webhook_message_id: None,
                        via_webhook: false,
                    },
                    Err(e) => CommitOutcome::Abandoned(format!("Missing permissions to reply: {e}")),
                }
            }
            Err(e) => CommitOutcome::Abandoned(format!("Failed to send reply: {e}")),
        }
    }

    /// Delete the original message and repost it as the author via webhook.
    ///
    /// The webhook send happens first; only then is the original removed, so
    /// a failed send never destroys the user's message. A failed delete
    /// degrades to suppressing the original preview.
    async fn webhook_repost(
        &self,
        message: &MessageRef,
        embedded_url: &str,
    ) -> Result<i64, embedfix_error::GatewayError> {
        let webhook_message_id = self.gateway.repost_via_webhook(message, embedded_url).await?;

        if let Err(e) = self
            .gateway
            .delete_message(message.channel_id, message.message_id)
            .await
        {
            warn!(error = %e, "Failed to delete original message, suppressing instead");
            if let Err(e) = self
                .gateway
                .suppress_embeds(message.channel_id, message.message_id)
                .await
            {
                warn!(error = %e, "Failed to suppress original message embed");
            }
        }

        Ok(webhook_message_id)
    }

    /// Persist the success record and its audit entry.
    async fn record_success(
        &self,
        item: &ValidationQueueItem,
        candidate: &Candidate,
        webhook_message_id: Option<i64>,
        via_webhook: bool,
    ) -> EmbedfixResult<()> {
        let message = &item.message;
        info!(prefix = candidate.prefix, via_webhook, "Successfully embedded URL");

        self.store
            .record_transform(&TransformRecord {
                message_id: message.message_id,
                channel_id: message.channel_id,
                server_id: message.guild_id,
                user_id: message.author_id,
                original_url: item.original_url.clone(),
                embedded_url: Some(candidate.url.clone()),
                prefix_used: Some(candidate.prefix.clone()),
                status: ValidationStatus::Success,
                error: None,
                webhook_message_id,
            })
            .await?;

        let event = if via_webhook {
            AuditEvent {
                server_id: message.guild_id,
                user_id: message.author_id,
                action: "webhook_repost",
                target_type: "webhook_message",
                target_id: webhook_message_id.unwrap_or(message.message_id).to_string(),
                details: json!({
                    "original_url": item.original_url,
                    "embedded_url": candidate.url,
                    "prefix_used": candidate.prefix,
                    "webhook_message_id": webhook_message_id,
                }),
            }
        } else {
            AuditEvent {
                server_id: message.guild_id,
                user_id: message.author_id,
                action: "url_embedded",
                target_type: "message",
                target_id: message.message_id.to_string(),
                details: json!({
                    "original_url": item.original_url,
                    "embedded_url": candidate.url,
                    "prefix_used": candidate.prefix,
                }),
            }
        };
        self.audit(event).await;
        Ok(())
    }

    /// Persist the restricted-content short-circuit and warn the user.
    async fn commit_restricted(
        &self,
        item: &ValidationQueueItem,
        settings: &GuildEmbedSettings,
    ) -> EmbedfixResult<()> {
        let message = &item.message;
        info!(url = item.original_url, "Content is age-restricted, skipping candidates");

        self.persist_failure(item, "Content is age-restricted".to_string())
            .await?;

        if !settings.silence_restricted_warning {
            if let Err(e) = self
                .gateway
                .reply(
                    message.channel_id,
                    message.message_id,
                    &settings.restricted_warning_message,
                )
                .await
            {
                warn!(error = %e, "Failed to send restricted-content warning");
            }
        }
        Ok(())
    }

    /// Persist an exhaustion/abandonment failure and warn the user.
    async fn commit_failure(
        &self,
        item: &ValidationQueueItem,
        _settings: &GuildEmbedSettings,
        error: String,
    ) -> EmbedfixResult<()> {
        let message = &item.message;
        warn!(url = item.original_url, error, "No valid embed candidate found");

        self.persist_failure(item, error).await?;

        if let Err(e) = self
            .gateway
            .reply(
                message.channel_id,
                message.message_id,
                &self.spec.failure_reply(&item.original_url),
            )
            .await
        {
            warn!(error = %e, "Failed to send failure reply");
        }
        Ok(())
    }

    /// Write the failed transform record and its audit entry.
    async fn persist_failure(&self, item: &ValidationQueueItem, error: String) -> EmbedfixResult<()> {
        let message = &item.message;
        self.store
            .record_transform(&TransformRecord {
                message_id: message.message_id,
                channel_id: message.channel_id,
                server_id: message.guild_id,
                user_id: message.author_id,
                original_url: item.original_url.clone(),
                embedded_url: None,
                prefix_used: None,
                status: ValidationStatus::Failed,
                error: Some(error.clone()),
                webhook_message_id: None,
            })
            .await?;

        self.audit(AuditEvent {
            server_id: message.guild_id,
            user_id: message.author_id,
            action: "validation_failed",
            target_type: "message",
            target_id: message.message_id.to_string(),
            details: json!({
                "original_url": item.original_url,
                "error": error,
            }),
        })
        .await;
        Ok(())
    }

    /// Memoized feature-id lookup.
    async fn feature_id(&self) -> EmbedfixResult<Option<Uuid>> {
        let name = self.spec.platform.feature_name();
        let mut cache = self.feature_ids.lock().await;
        if let Some(id) = cache.get(&name) {
            return Ok(Some(*id));
        }
        let id = self.store.feature_id(name).await?;
        if let Some(id) = id {
            cache.insert(name, id);
        }
        Ok(id)
    }

    /// Append an audit event; failures are logged, never surfaced.
    async fn audit(&self, event: AuditEvent) {
        if let Err(e) = self.store.record_audit(&event).await {
            warn!(action = event.action, error = %e, "Failed to log audit event");
        }
    }
}
