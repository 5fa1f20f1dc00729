//! Per-guild embed settings, fetched from the dashboard config service.
//!
//! The dashboard exposes `GET /api/bot/{feature}-embed-config/{guild_id}`
//! without auth for the bot. Responses are cached per guild for a fixed
//! freshness window; any fetch or parse failure substitutes the hard-coded
//! [`GuildEmbedSettings::default`] so the pipeline never blocks on
//! configuration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod fetcher;

pub use client::{SETTINGS_TTL, SettingsClient};
pub use fetcher::{HttpSettingsFetcher, SettingsFetcher};

pub use embedfix_core::GuildEmbedSettings;
