//! Pre-probe gate for age-restricted Twitter/X content.
//!
//! Embed proxies cannot render age-restricted posts, so probing every
//! candidate for one is wasted traffic that ends in a confusing generic
//! failure. The gate asks mirror services about the original URL first and
//! short-circuits the whole candidate loop when the post is restricted.

use async_trait::async_trait;
use embedfix_core::mirror_url;
use std::time::Duration;
use tracing::{debug, info};

/// Marker phrases that identify a restricted post in a mirror response body.
const RESTRICTION_MARKERS: &[&str] = &[
    "age-restricted",
    "adult content",
    "sensitive content",
    "restricted content",
    "log in to view",
];

/// Mirror domains queried for the original URL.
const MIRROR_DOMAINS: &[&str] = &["fxtwitter.com", "vxtwitter.com"];

/// Verdict of the pre-probe restriction check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictionVerdict {
    /// Proceed with candidate probing.
    Open,
    /// Skip the candidate loop; content cannot be embedded.
    Restricted,
}

/// Checks whether a post is restricted before any candidate is probed.
#[async_trait]
pub trait RestrictionGate: Send + Sync {
    /// Check the original URL. Gate errors must map to
    /// [`RestrictionVerdict::Open`]: an unreachable mirror never blocks
    /// normal validation.
    async fn check(&self, original_url: &str) -> RestrictionVerdict;
}

/// Mirror-service gate for Twitter/X.
///
/// A mirror answering HTTP 403, or a response body containing one of the
/// fixed marker phrases (case-insensitive), marks the post restricted. Any
/// network error just moves on to the next mirror.
pub struct TwitterMirrorGate {
    client: reqwest::Client,
    mirrors: Vec<String>,
    timeout: Duration,
}

impl TwitterMirrorGate {
    /// Create a gate over the standard mirror list with a 5s timeout.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            mirrors: MIRROR_DOMAINS.iter().map(|m| m.to_string()).collect(),
            timeout: Duration::from_secs(5),
        }
    }

    /// Create a gate over custom mirror domains.
    pub fn with_mirrors(mirrors: Vec<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            mirrors,
            timeout: Duration::from_secs(5),
        }
    }

    /// Whether a response body carries a restriction marker.
    fn body_is_restricted(body: &str) -> bool {
        let lower = body.to_lowercase();
        RESTRICTION_MARKERS.iter().any(|marker| lower.contains(marker))
    }
}

impl Default for TwitterMirrorGate {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RestrictionGate for TwitterMirrorGate {
    async fn check(&self, original_url: &str) -> RestrictionVerdict {
        for mirror in &self.mirrors {
            let url = mirror_url(original_url, mirror);
            let response = match self.client.get(&url).timeout(self.timeout).send().await {
                Ok(response) => response,
                Err(e) => {
                    debug!(mirror, error = %e, "Mirror unreachable, skipping");
                    continue;
                }
            };

            if response.status().as_u16() == 403 {
                info!(mirror, original_url, "Mirror returned 403, content restricted");
                return RestrictionVerdict::Restricted;
            }

            match response.text().await {
                Ok(body) if Self::body_is_restricted(&body) => {
                    info!(mirror, original_url, "Restriction marker found in mirror response");
                    return RestrictionVerdict::Restricted;
                }
                Ok(_) => return RestrictionVerdict::Open,
                Err(e) => {
                    debug!(mirror, error = %e, "Failed to read mirror response, skipping");
                    continue;
                }
            }
        }

        RestrictionVerdict::Open
    }
}
