//! Reachability prober.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};

/// Default probe timeout.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Classified result of probing one candidate URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The candidate responded below HTTP 400.
    Reachable,
    /// The candidate is disqualified; the string explains why
    /// (`Timeout`, `Client error: ...`, `HTTP <status>`).
    Unreachable(String),
}

impl ProbeOutcome {
    /// Whether the candidate validated.
    pub fn is_reachable(&self) -> bool {
        matches!(self, ProbeOutcome::Reachable)
    }
}

/// Probes a candidate URL for reachability.
#[async_trait]
pub trait UrlProber: Send + Sync {
    /// Probe `url`. Never fails: every error becomes an
    /// [`ProbeOutcome::Unreachable`] classification.
    async fn probe(&self, url: &str) -> ProbeOutcome;
}

/// HTTP prober: HEAD first, GET as fallback.
///
/// HEAD is cheap but some proxy services reject it, so a status of 400 or
/// above triggers one GET retry before the candidate is disqualified.
/// Status below 400 (after redirects) counts as reachable.
pub struct HttpProber {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpProber {
    /// Create a prober with the default 5s timeout.
    pub fn new() -> Self {
        Self::with_timeout(PROBE_TIMEOUT)
    }

    /// Create a prober with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    fn classify_error(err: &reqwest::Error) -> String {
        if err.is_timeout() {
            "Timeout".to_string()
        } else {
            format!("Client error: {err}")
        }
    }
}

impl Default for HttpProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlProber for HttpProber {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        let head = self.client.head(url).timeout(self.timeout).send().await;

        let head_status = match head {
            Ok(response) if response.status().as_u16() < 400 => {
                info!(url, status = %response.status(), "URL validation successful");
                return ProbeOutcome::Reachable;
            }
            Ok(response) => response.status(),
            Err(e) => {
                let error = Self::classify_error(&e);
                warn!(url, error, "URL validation error");
                return ProbeOutcome::Unreachable(error);
            }
        };

        // Some proxy services reject HEAD outright; retry with GET before
        // disqualifying the candidate.
        match self.client.get(url).timeout(self.timeout).send().await {
            Ok(response) if response.status().as_u16() < 400 => {
                info!(url, status = %response.status(), "URL validation successful via GET");
                ProbeOutcome::Reachable
            }
            Ok(response) => {
                let error = format!("HTTP {}", response.status().as_u16());
                warn!(url, error, head_status = %head_status, "URL validation failed");
                ProbeOutcome::Unreachable(error)
            }
            Err(e) => {
                let error = Self::classify_error(&e);
                warn!(url, error, "URL validation error on GET fallback");
                ProbeOutcome::Unreachable(error)
            }
        }
    }
}
