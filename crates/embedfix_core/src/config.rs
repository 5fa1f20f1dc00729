//! Per-guild embed configuration types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Rewrite strategy for a configured embed proxy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum EmbedType {
    /// Prepend the prefix to the origin domain (`dd` + `instagram.com`).
    #[display("prefix")]
    Prefix,
    /// Swap the origin domain for the prefix wholesale (`fxtwitter.com`).
    #[display("replacement")]
    Replacement,
}

/// One embed-proxy rule for a guild, edited externally via the dashboard.
///
/// Configs for a (guild, feature) pair form an ordered sequence: ascending
/// `priority` defines the order candidates are probed in. The bot only ever
/// reads these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedConfig {
    /// Row id.
    pub id: i32,
    /// Guild this rule belongs to.
    pub server_id: i64,
    /// Feature this rule belongs to (instagram_embed / twitter_embed).
    pub feature_id: Uuid,
    /// Proxy label (prefix mode) or full replacement domain.
    pub prefix: String,
    /// Rewrite strategy.
    pub embed_type: EmbedType,
    /// Trial order, ascending = tried first.
    pub priority: i32,
    /// Inactive rules are never fetched by the bot.
    pub active: bool,
}

/// Per-guild behavioral flags, fetched from the dashboard config service.
///
/// On any fetch or parse failure the hard-coded [`Default`] record is
/// substituted so the pipeline never blocks on configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildEmbedSettings {
    /// Delete-and-repost-as-author mode instead of suppress+reply.
    #[serde(default)]
    pub webhook_repost_enabled: bool,
    /// Whether old transform records are pruned for this guild.
    #[serde(default = "default_true")]
    pub pruning_enabled: bool,
    /// Retention window for transform records, in days.
    #[serde(default = "default_pruning_max_days")]
    pub pruning_max_days: i32,
    /// Mention the original author when someone replies to a repost.
    #[serde(default = "default_true")]
    pub webhook_reply_notifications: bool,
    /// Also mention authors replying to their own repost.
    #[serde(default)]
    pub notify_self_replies: bool,
    /// Suppress the original message's link preview.
    #[serde(default = "default_true")]
    pub suppress_original_embed: bool,
    /// React to messages that already use a configured proxy.
    #[serde(default = "default_true")]
    pub reaction_enabled: bool,
    /// Emoji for the already-embedded reaction; custom emoji name or glyph.
    #[serde(default = "default_reaction_emoji")]
    pub reaction_emoji: String,
    /// Suppress the warning reply for age-restricted content.
    #[serde(default)]
    pub silence_restricted_warning: bool,
    /// Warning reply sent when content is age-restricted.
    #[serde(default = "default_restricted_warning_message")]
    pub restricted_warning_message: String,
}

fn default_true() -> bool {
    true
}

fn default_pruning_max_days() -> i32 {
    90
}

fn default_reaction_emoji() -> String {
    "🙏".to_string()
}

fn default_restricted_warning_message() -> String {
    "Cannot embed restricted content, please login to the original URL to view".to_string()
}

impl Default for GuildEmbedSettings {
    fn default() -> Self {
        Self {
            webhook_repost_enabled: false,
            pruning_enabled: default_true(),
            pruning_max_days: default_pruning_max_days(),
            webhook_reply_notifications: default_true(),
            notify_self_replies: false,
            suppress_original_embed: default_true(),
            reaction_enabled: default_true(),
            reaction_emoji: default_reaction_emoji(),
            silence_restricted_warning: false,
            restricted_warning_message: default_restricted_warning_message(),
        }
    }
}
