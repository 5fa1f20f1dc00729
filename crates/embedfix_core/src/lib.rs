//! Domain types and pure logic for the embedfix link rewrite bot.
//!
//! This crate holds everything that needs no I/O:
//! - [`EmbedConfig`] and [`GuildEmbedSettings`], the per-guild rewrite configuration
//! - [`Platform`] and URL detection ([`detect_url`], [`is_already_embedded`])
//! - The rewrite resolver ([`candidates`]) that turns an original URL plus an
//!   ordered config list into the sequence of proxy URLs to probe
//!
//! The ordering contract matters: embed configs are tried strictly in
//! ascending `priority` order, and the pipeline commits to the first
//! candidate that validates.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod detect;
mod message;
mod outcome;
mod rewrite;

pub use config::{EmbedConfig, EmbedType, GuildEmbedSettings};
pub use detect::{DetectedUrl, Platform, detect_url, is_already_embedded};
pub use message::MessageRef;
pub use outcome::ValidationStatus;
pub use rewrite::{Candidate, candidates, mirror_url, rewrite_url};
