//! PostgreSQL repository for the rewrite pipeline.

use crate::models::{EmbedConfigRow, NewAuditLog, NewMessageData};
use crate::schema::{
    audit_logs, discord_channels, discord_users, embed_configs, features, message_data,
    pruning_config,
};
use embedfix_core::EmbedConfig;
use embedfix_error::DatabaseError;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::instrument;
use uuid::Uuid;

/// Result type for repository operations.
pub type DbResult<T> = Result<T, DatabaseError>;

/// PostgreSQL repository for embedfix data.
///
/// Provides the operation set the pipeline needs: ordered config reads,
/// insert-once transform records, append-only audit entries, denormalized
/// user/channel upserts, and webhook reply attribution.
///
/// # Example
/// ```no_run
/// use embedfix_database::{EmbedRepository, establish_connection};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let conn = establish_connection()?;
///     let repo = EmbedRepository::new(conn);
///     let feature = repo.get_feature_id("twitter_embed").await?;
///     Ok(())
/// }
/// ```
pub struct EmbedRepository {
    /// Database connection wrapped in Arc<Mutex> for async access.
    conn: Arc<Mutex<PgConnection>>,
}

impl EmbedRepository {
    /// Create a new repository.
    pub fn new(conn: PgConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Create a repository from a shared connection.
    pub fn from_arc(conn: Arc<Mutex<PgConnection>>) -> Self {
        Self { conn }
    }

    /// Active embed configs for a (guild, feature), ascending by priority.
    ///
    /// The returned order is the resolver's trial order.
    #[instrument(skip(self))]
    pub async fn get_embed_configs(
        &self,
        server_id: i64,
        feature_id: Uuid,
    ) -> DbResult<Vec<EmbedConfig>> {
        let mut conn = self.conn.lock().await;

        let rows: Vec<EmbedConfigRow> = embed_configs::table
            .filter(embed_configs::server_id.eq(server_id))
            .filter(embed_configs::feature_id.eq(feature_id))
            .filter(embed_configs::active.eq(true))
            .order(embed_configs::priority.asc())
            .select(EmbedConfigRow::as_select())
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;

        Ok(rows.into_iter().map(EmbedConfig::from).collect())
    }

    /// Record the terminal outcome for a message.
    ///
    /// Insert-once: `ON CONFLICT (message_id) DO NOTHING`, so a repeated
    /// call for the same message id is a no-op rather than an error.
    #[instrument(skip(self, record), fields(message_id = %record.message_id, status = %record.validation_status))]
    pub async fn insert_message_data(&self, record: &NewMessageData) -> DbResult<()> {
        let mut conn = self.conn.lock().await;

        diesel::insert_into(message_data::table)
            .values(record)
            .on_conflict(message_data::message_id)
            .do_nothing()
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;

        Ok(())
    }

    /// Append an audit log entry.
    #[instrument(skip(self, entry), fields(action = %entry.action, server_id = %entry.server_id))]
    pub async fn insert_audit_log(&self, entry: &NewAuditLog) -> DbResult<()> {
        let mut conn = self.conn.lock().await;

        diesel::insert_into(audit_logs::table)
            .values(entry)
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;

        Ok(())
    }

    /// Store or refresh a user's denormalized name record.
    #[instrument(skip(self))]
    pub async fn upsert_user(&self, user_id: i64, username: &str) -> DbResult<()> {
        let mut conn = self.conn.lock().await;

        diesel::insert_into(discord_users::table)
            .values((
                discord_users::id.eq(user_id),
                discord_users::username.eq(username),
            ))
            .on_conflict(discord_users::id)
            .do_update()
            .set((
                discord_users::username.eq(username),
                discord_users::last_seen.eq(diesel::dsl::now),
            ))
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;

        Ok(())
    }

    /// Store or refresh a channel's denormalized name record.
    #[instrument(skip(self))]
    pub async fn upsert_channel(&self, channel_id: i64, name: &str) -> DbResult<()> {
        let mut conn = self.conn.lock().await;

        diesel::insert_into(discord_channels::table)
            .values((
                discord_channels::id.eq(channel_id),
                discord_channels::name.eq(name),
            ))
            .on_conflict(discord_channels::id)
            .do_update()
            .set((
                discord_channels::name.eq(name),
                discord_channels::last_seen.eq(diesel::dsl::now),
            ))
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;

        Ok(())
    }

    /// Look up the author of the original message behind a webhook repost.
    #[instrument(skip(self))]
    pub async fn get_original_user_from_webhook(
        &self,
        webhook_message_id: i64,
    ) -> DbResult<Option<i64>> {
        let mut conn = self.conn.lock().await;

        message_data::table
            .filter(message_data::webhook_message_id.eq(webhook_message_id))
            .select(message_data::user_id)
            .first(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)
    }

    /// Resolve an active feature's id by name.
    #[instrument(skip(self))]
    pub async fn get_feature_id(&self, name: &str) -> DbResult<Option<Uuid>> {
        let mut conn = self.conn.lock().await;

        features::table
            .filter(features::name.eq(name))
            .filter(features::active.eq(true))
            .select(features::id)
            .first(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)
    }

    /// Insert the default pruning row for a guild if none exists.
    #[instrument(skip(self))]
    pub async fn ensure_pruning_config(&self, server_id: i64) -> DbResult<()> {
        let mut conn = self.conn.lock().await;

        diesel::insert_into(pruning_config::table)
            .values((
                pruning_config::server_id.eq(server_id),
                pruning_config::enabled.eq(true),
                pruning_config::max_days.eq(90),
            ))
            .on_conflict(pruning_config::server_id)
            .do_nothing()
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;

        Ok(())
    }

    /// Delete transform records older than `max_days` for a guild.
    #[instrument(skip(self))]
    pub async fn prune_message_data(&self, server_id: i64, max_days: i32) -> DbResult<usize> {
        let cutoff = chrono::Utc::now().naive_utc() - chrono::Duration::days(max_days as i64);
        let mut conn = self.conn.lock().await;

        diesel::delete(
            message_data::table
                .filter(message_data::server_id.eq(server_id))
                .filter(message_data::checked_at.lt(cutoff)),
        )
        .execute(&mut *conn)
        .map_err(DatabaseError::from)
    }
}
