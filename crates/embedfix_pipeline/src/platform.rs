//! Per-platform pipeline parameterization.

use crate::RestrictionGate;
use embedfix_core::Platform;
use std::sync::Arc;

/// Everything that differs between the Instagram and Twitter pipelines.
///
/// Both platforms run the same state machine; the differences reduce to the
/// URL pattern (via [`Platform`]), the reply style, and the optional
/// pre-probe gate.
#[derive(Clone)]
pub struct PlatformSpec {
    /// Which platform's URLs this pipeline handles.
    pub platform: Platform,
    /// Reply with the whole message content, the detected URL substituted
    /// (Instagram), versus replying with the rewritten URL alone (Twitter).
    pub reply_with_full_content: bool,
    /// Pre-probe gate; `None` skips the check entirely.
    pub gate: Option<Arc<dyn RestrictionGate>>,
}

impl PlatformSpec {
    /// The Instagram pipeline: full-content replies, no gate.
    pub fn instagram() -> Self {
        Self {
            platform: Platform::Instagram,
            reply_with_full_content: true,
            gate: None,
        }
    }

    /// The Twitter/X pipeline: URL-only replies, age-restriction gate.
    pub fn twitter(gate: Arc<dyn RestrictionGate>) -> Self {
        Self {
            platform: Platform::Twitter,
            reply_with_full_content: false,
            gate: Some(gate),
        }
    }

    /// User-visible warning for a message whose candidates all failed.
    pub fn failure_reply(&self, original_url: &str) -> String {
        match self.platform {
            Platform::Instagram => {
                format!("⚠️ Could not embed the Instagram URL. Original: {original_url}")
            }
            Platform::Twitter => {
                format!("⚠️ Could not embed the Twitter/X URL. Original: {original_url}")
            }
        }
    }
}
