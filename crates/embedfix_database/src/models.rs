//! Row and insert models for the embedfix tables.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use embedfix_core::{EmbedConfig, EmbedType};
use uuid::Uuid;

/// Database row for the embed_configs table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::embed_configs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EmbedConfigRow {
    /// Row id.
    pub id: i32,
    /// Guild this rule belongs to.
    pub server_id: i64,
    /// Feature this rule belongs to.
    pub feature_id: Uuid,
    /// Proxy label or replacement domain.
    pub prefix: String,
    /// `prefix` or `replacement`.
    pub embed_type: String,
    /// Trial order, ascending = tried first.
    pub priority: i32,
    /// Inactive rules are never fetched by the bot.
    pub active: bool,
    /// Row creation time.
    pub created_at: NaiveDateTime,
    /// Last dashboard edit.
    pub updated_at: NaiveDateTime,
}

impl From<EmbedConfigRow> for EmbedConfig {
    fn from(row: EmbedConfigRow) -> Self {
        EmbedConfig {
            id: row.id,
            server_id: row.server_id,
            feature_id: row.feature_id,
            prefix: row.prefix,
            // Unknown column values fall back to prefix mode, matching the
            // dashboard's backward-compatible default.
            embed_type: match row.embed_type.as_str() {
                "replacement" => EmbedType::Replacement,
                _ => EmbedType::Prefix,
            },
            priority: row.priority,
            active: row.active,
        }
    }
}

/// Insertable struct for the message_data table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::message_data)]
pub struct NewMessageData {
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
    pub embed_prefix_used: Option<String>,
    /// `success` or `failed`.
    pub validation_status: String,
    /// Last or aggregate error on failure.
    pub validation_error: Option<String>,
    /// Id of the webhook repost, when applicable.
    pub webhook_message_id: Option<i64>,
    /// When the terminal outcome was recorded.
    pub checked_at: NaiveDateTime,
}

/// Insertable struct for the audit_logs table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::audit_logs)]
pub struct NewAuditLog {
    /// Guild the event happened in.
    pub server_id: i64,
    /// Acting user.
    pub user_id: i64,
    /// Event name.
    pub action: String,
    /// Kind of entity the event targets.
    pub target_type: String,
    /// Id of the targeted entity.
    pub target_id: String,
    /// Free-form event payload.
    pub details: Option<serde_json::Value>,
}
