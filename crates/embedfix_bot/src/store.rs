//! Diesel-repository-backed transform store.

use async_trait::async_trait;
use chrono::Utc;
use embedfix_core::EmbedConfig;
use embedfix_database::{EmbedRepository, NewAuditLog, NewMessageData};
use embedfix_error::DatabaseError;
use embedfix_pipeline::{AuditEvent, TransformRecord, TransformStore};
use std::sync::Arc;
use uuid::Uuid;

/// Adapts [`EmbedRepository`] to the pipeline's `TransformStore` trait.
pub struct StoreAdapter {
    repository: Arc<EmbedRepository>,
}

impl StoreAdapter {
    /// Wrap a repository.
    pub fn new(repository: Arc<EmbedRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl TransformStore for StoreAdapter {
    async fn embed_configs(
        &self,
        server_id: i64,
        feature_id: Uuid,
    ) -> Result<Vec<EmbedConfig>, DatabaseError> {
        self.repository.get_embed_configs(server_id, feature_id).await
    }

    async fn feature_id(&self, name: &str) -> Result<Option<Uuid>, DatabaseError> {
        self.repository.get_feature_id(name).await
    }

    async fn record_transform(&self, record: &TransformRecord) -> Result<(), DatabaseError> {
        self.repository
            .insert_message_data(&NewMessageData {
                message_id: record.message_id,
                channel_id: record.channel_id,
                server_id: record.server_id,
                user_id: record.user_id,
                original_url: record.original_url.clone(),
                embedded_url: record.embedded_url.clone(),
                embed_prefix_used: record.prefix_used.clone(),
                validation_status: record.status.as_str().to_string(),
                validation_error: record.error.clone(),
                webhook_message_id: record.webhook_message_id,
                checked_at: Utc::now().naive_utc(),
            })
            .await
    }

    async fn record_audit(&self, event: &AuditEvent) -> Result<(), DatabaseError> {
        self.repository
            .insert_audit_log(&NewAuditLog {
                server_id: event.server_id,
                user_id: event.user_id,
                action: event.action.to_string(),
                target_type: event.target_type.to_string(),
                target_id: event.target_id.clone(),
                details: Some(event.details.clone()),
            })
            .await
    }

    async fn upsert_user(&self, user_id: i64, username: &str) -> Result<(), DatabaseError> {
        self.repository.upsert_user(user_id, username).await
    }

    async fn upsert_channel(&self, channel_id: i64, name: &str) -> Result<(), DatabaseError> {
        self.repository.upsert_channel(channel_id, name).await
    }

    async fn original_user_for_webhook(
        &self,
        webhook_message_id: i64,
    ) -> Result<Option<i64>, DatabaseError> {
        self.repository
            .get_original_user_from_webhook(webhook_message_id)
            .await
    }
}
