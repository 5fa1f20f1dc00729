//! Persistence capability trait for transform records and audit entries.

use async_trait::async_trait;
use embedfix_core::{EmbedConfig, ValidationStatus};
use embedfix_error::DatabaseError;
use uuid::Uuid;

/// Terminal outcome for one original message, keyed by message id.
///
/// The store persists this insert-once: writing a second record for the
/// same message id must be a silent no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRecord {
    /// Original message id (unique key).
    pub message_id: i64,
    /// Channel the message was posted in.
    pub channel_id: i64,
    /// Guild the message was posted in.
    pub server_id: i64,
    /// Message author.
    pub user_id: i64,
    /// URL as detected in the message.
    pub original_url: String,
    /// Rewritten URL, when validation succeeded.
    pub embedded_url: Option<String>,
    /// Prefix of the winning candidate.
    pub prefix_used: Option<String>,
    /// Terminal status.
    pub status: ValidationStatus,
    /// Last or aggregate error on failure.
    pub error: Option<String>,
    /// Id of the webhook repost, when applicable.
    pub webhook_message_id: Option<i64>,
}

/// Append-only audit event.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    /// Guild the event happened in.
    pub server_id: i64,
    /// Acting user.
    pub user_id: i64,
    /// Event name (url_detected, already_embedded, url_embedded,
    /// webhook_repost, validation_failed).
    pub action: &'static str,
    /// Kind of entity the event targets.
    pub target_type: &'static str,
    /// Id of the targeted entity.
    pub target_id: String,
    /// Free-form event payload.
    pub details: serde_json::Value,
}

/// Persistence operations the pipeline needs.
///
/// Implemented over the diesel repository in `embedfix_bot`; tests use an
/// in-memory mock.
#[async_trait]
pub trait TransformStore: Send + Sync {
    /// Active embed configs for a (guild, feature), ascending by priority.
    async fn embed_configs(
        &self,
        server_id: i64,
        feature_id: Uuid,
    ) -> Result<Vec<EmbedConfig>, DatabaseError>;

    /// Resolve an active feature id by name.
    async fn feature_id(&self, name: &str) -> Result<Option<Uuid>, DatabaseError>;

    /// Persist a terminal outcome, insert-once by message id.
    async fn record_transform(&self, record: &TransformRecord) -> Result<(), DatabaseError>;

    /// Append an audit event.
    async fn record_audit(&self, event: &AuditEvent) -> Result<(), DatabaseError>;

    /// Store or refresh a user's denormalized name record.
    async fn upsert_user(&self, user_id: i64, username: &str) -> Result<(), DatabaseError>;

    /// Store or refresh a channel's denormalized name record.
    async fn upsert_channel(&self, channel_id: i64, name: &str) -> Result<(), DatabaseError>;

    /// Author of the original message behind a webhook repost, if tracked.
    async fn original_user_for_webhook(
        &self,
        webhook_message_id: i64,
    ) -> Result<Option<i64>, DatabaseError>;
}
