//! Config service fetch trait and HTTP implementation.

use async_trait::async_trait;
use embedfix_core::{GuildEmbedSettings, Platform};
use embedfix_error::HttpError;
use std::time::Duration;

/// Fetches one guild's settings from the configuration service.
///
/// The trait seam exists so the cache/fallback behavior in
/// [`crate::SettingsClient`] can be tested without a live dashboard.
#[async_trait]
pub trait SettingsFetcher: Send + Sync {
    /// Fetch settings for a guild. Any failure (network, non-200, parse)
    /// is an error; the caller decides how to degrade.
    async fn fetch(&self, guild_id: i64) -> Result<GuildEmbedSettings, HttpError>;
}

/// reqwest-backed fetcher against the dashboard API.
pub struct HttpSettingsFetcher {
    client: reqwest::Client,
    api_url: String,
    feature: Platform,
    timeout: Duration,
}

impl HttpSettingsFetcher {
    /// Create a fetcher for one platform feature.
    ///
    /// `api_url` is the dashboard base URL (e.g. `http://localhost:3001`).
    pub fn new(api_url: impl Into<String>, feature: Platform) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            feature,
            timeout: Duration::from_secs(5),
        }
    }

    fn endpoint(&self, guild_id: i64) -> String {
        format!(
            "{}/api/bot/{}-embed-config/{}",
            self.api_url, self.feature, guild_id
        )
    }
}

#[async_trait]
impl SettingsFetcher for HttpSettingsFetcher {
    async fn fetch(&self, guild_id: i64) -> Result<GuildEmbedSettings, HttpError> {
        let url = self.endpoint(guild_id);
        let response = self.client.get(&url).timeout(self.timeout).send().await?;

        if !response.status().is_success() {
            return Err(HttpError::new(format!(
                "config service returned HTTP {} for {}",
                response.status(),
                url
            )));
        }

        Ok(response.json::<GuildEmbedSettings>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_uses_feature_segment() {
        let fetcher = HttpSettingsFetcher::new("http://localhost:3001", Platform::Twitter);
        assert_eq!(
            fetcher.endpoint(42),
            "http://localhost:3001/api/bot/twitter-embed-config/42"
        );

        let fetcher = HttpSettingsFetcher::new("http://localhost:3001", Platform::Instagram);
        assert_eq!(
            fetcher.endpoint(7),
            "http://localhost:3001/api/bot/instagram-embed-config/7"
        );
    }
}
