//! TTL-cached guild settings client.

use crate::SettingsFetcher;
use embedfix_cache::TtlCache;
use embedfix_core::GuildEmbedSettings;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::warn;

/// Freshness window for cached guild settings.
pub const SETTINGS_TTL: Duration = Duration::from_secs(60);

/// Guild settings lookup with a per-guild TTL cache and default fallback.
///
/// Getting settings never fails: a fetch error (config service down,
/// non-200, bad payload) is logged at warn level and the hard-coded default
/// record is returned. Failed fetches are not cached, so the next lookup
/// retries the service.
pub struct SettingsClient {
    fetcher: Arc<dyn SettingsFetcher>,
    cache: Mutex<TtlCache<i64, GuildEmbedSettings>>,
}

impl SettingsClient {
    /// Create a client with the standard 60s freshness window.
    pub fn new(fetcher: Arc<dyn SettingsFetcher>) -> Self {
        Self::with_ttl(fetcher, SETTINGS_TTL)
    }

    /// Create a client with a custom freshness window.
    pub fn with_ttl(fetcher: Arc<dyn SettingsFetcher>, ttl: Duration) -> Self {
        Self {
            fetcher,
            cache: Mutex::new(TtlCache::new(ttl)),
        }
    }

    /// Settings for a guild: cached first, then fetched, then defaulted.
    pub async fn get(&self, guild_id: i64) -> GuildEmbedSettings {
        {
            let mut cache = self.cache.lock().await;
            if let Some(settings) = cache.get(&guild_id) {
                return settings.clone();
            }
        }

        match self.fetcher.fetch(guild_id).await {
            Ok(settings) => {
                let mut cache = self.cache.lock().await;
                cache.insert(guild_id, settings.clone());
                settings
            }
            Err(e) => {
                warn!(guild_id, error = %e, "Failed to fetch embed settings, using defaults");
                GuildEmbedSettings::default()
            }
        }
    }

    /// Drop the cached settings for one guild.
    pub async fn invalidate(&self, guild_id: i64) {
        self.cache.lock().await.invalidate(&guild_id);
    }

    /// Drop all cached settings.
    pub async fn clear(&self) {
        self.cache.lock().await.clear();
    }
}
