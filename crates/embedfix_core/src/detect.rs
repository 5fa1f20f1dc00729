//! Platform URL detection.
//!
//! Pattern-matches inbound message text for Instagram and Twitter/X post
//! URLs. Only the first match in a message is processed; messages carrying
//! several links only get the first one rewritten.

use crate::{EmbedConfig, EmbedType};
use regex::Regex;
use std::sync::LazyLock;

// The optional [a-z]+ run before the domain admits already-rewritten
// hosts like ddinstagram.com and vxtwitter.com so they can be recognized
// instead of re-queued.
static INSTAGRAM_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)https?://(?:www\.)?(?:[a-z]+)?instagram\.com/(?:p|reel|reels|tv)/([a-zA-Z0-9_-]+)/?",
    )
    .expect("valid instagram pattern")
});

static TWITTER_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://(?:www\.)?(?:[a-z]+)?(?:twitter\.com|x\.com)/\w+/status/(\d+)")
        .expect("valid twitter pattern")
});

/// Social platform a detected URL belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Platform {
    /// instagram.com post/reel/tv links.
    #[display("instagram")]
    Instagram,
    /// twitter.com and x.com status links.
    #[display("twitter")]
    Twitter,
}

impl Platform {
    /// Feature name as registered in the features table.
    pub fn feature_name(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram_embed",
            Platform::Twitter => "twitter_embed",
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            Platform::Instagram => &INSTAGRAM_URL,
            Platform::Twitter => &TWITTER_URL,
        }
    }
}

/// First platform URL found in a message, with its extracted post id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedUrl {
    /// The matched URL substring, exactly as written.
    pub url: String,
    /// Platform post identifier (shortcode or status id).
    pub post_id: String,
}

/// Find the first platform URL in `content`.
pub fn detect_url(platform: Platform, content: &str) -> Option<DetectedUrl> {
    let caps = platform.pattern().captures(content)?;
    Some(DetectedUrl {
        url: caps.get(0)?.as_str().to_string(),
        post_id: caps.get(1)?.as_str().to_string(),
    })
}

/// Whether `url` already points at one of the guild's configured proxies.
///
/// Replacement-mode rules match when the replacement domain appears anywhere
/// in the URL; prefix-mode rules match when the prefixed origin domain does.
/// Matching is case-insensitive.
pub fn is_already_embedded(platform: Platform, url: &str, configs: &[EmbedConfig]) -> bool {
    let lower = url.to_ascii_lowercase();
    configs.iter().any(|config| {
        let prefix = config.prefix.to_ascii_lowercase();
        match config.embed_type {
            EmbedType::Replacement => lower.contains(&prefix),
            EmbedType::Prefix => match platform {
                Platform::Instagram => lower.contains(&format!("{prefix}instagram.com")),
                Platform::Twitter => {
                    lower.contains(&format!("{prefix}twitter.com"))
                        || lower.contains(&format!("{prefix}x.com"))
                }
            },
        }
    })
}
