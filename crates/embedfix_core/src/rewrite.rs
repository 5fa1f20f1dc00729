//! Rewrite resolver: ordered candidate URLs for a detected link.

use crate::{EmbedConfig, EmbedType, Platform};

/// One rewritten URL to probe, tagged with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The rewritten URL.
    pub url: String,
    /// The configured prefix (or replacement domain) used.
    pub prefix: String,
}

/// Rewrite `original_url` according to a single config rule.
///
/// Instagram only supports prefix mode: `instagram.com` becomes
/// `{prefix}instagram.com`. Twitter prefix mode prepends to whichever of
/// `twitter.com`/`x.com` is present; replacement mode swaps that domain for
/// the prefix wholesale, path preserved. Domain matching is
/// case-insensitive; the rewritten domain is always lowercase.
pub fn rewrite_url(platform: Platform, original_url: &str, config: &EmbedConfig) -> String {
    let prefix = &config.prefix;
    match platform {
        Platform::Instagram => {
            replace_domain(original_url, "instagram.com", &format!("{prefix}instagram.com"))
        }
        Platform::Twitter => {
            let domain = if original_url.to_ascii_lowercase().contains("x.com") {
                "x.com"
            } else {
                "twitter.com"
            };
            let replacement = match config.embed_type {
                EmbedType::Prefix => format!("{prefix}{domain}"),
                EmbedType::Replacement => prefix.clone(),
            };
            replace_domain(original_url, domain, &replacement)
        }
    }
}

/// Produce candidates for every config rule, preserving the fetch order.
///
/// Configs arrive from the store already sorted by ascending priority; the
/// resolver does not reorder them.
pub fn candidates(
    platform: Platform,
    original_url: &str,
    configs: &[EmbedConfig],
) -> Vec<Candidate> {
    configs
        .iter()
        .map(|config| Candidate {
            url: rewrite_url(platform, original_url, config),
            prefix: config.prefix.clone(),
        })
        .collect()
}

/// Rewrite a Twitter/X URL onto a mirror domain.
///
/// Used by the age-restriction gate to build mirror-service URLs for the
/// original link without going through an [`EmbedConfig`].
pub fn mirror_url(original_url: &str, mirror_domain: &str) -> String {
    let domain = if original_url.to_ascii_lowercase().contains("x.com") {
        "x.com"
    } else {
        "twitter.com"
    };
    replace_domain(original_url, domain, mirror_domain)
}

/// Replace every case-insensitive occurrence of `needle` in `url`.
fn replace_domain(url: &str, needle: &str, replacement: &str) -> String {
    let lower = url.to_ascii_lowercase();
    let mut out = String::with_capacity(url.len() + replacement.len());
    let mut idx = 0;
    while let Some(pos) = lower[idx..].find(needle) {
        let start = idx + pos;
        out.push_str(&url[idx..start]);
        out.push_str(replacement);
        idx = start + needle.len();
    }
    out.push_str(&url[idx..]);
    out
}
