//! URL-rewrite validation pipeline.
//!
//! The core of embedfix: a per-guild, priority-ordered, asynchronously
//! queued process that takes a detected social URL, tries a sequence of
//! candidate rewritten URLs, validates each with a live probe, and commits
//! exactly one terminal outcome per input message.
//!
//! ```text
//! inbound message -> inspect (detect + audit, or react if already rewritten)
//!                 -> ValidationQueue -> worker
//!                 -> resolver x prober loop -> committer
//!                 -> transform record + audit entry
//! ```
//!
//! The pipeline depends only on capability traits ([`MessagingGateway`],
//! [`TransformStore`], [`UrlProber`], [`RestrictionGate`]); concrete
//! platform and database bindings live in `embedfix_bot`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gateway;
mod notify;
mod pipeline;
mod platform;
mod probe;
mod queue;
mod restrict;
mod store;

pub use gateway::MessagingGateway;
pub use notify::ReplyNotifier;
pub use pipeline::RewritePipeline;
pub use platform::PlatformSpec;
pub use probe::{HttpProber, ProbeOutcome, UrlProber};
pub use queue::{QueueOptions, ValidationQueue, ValidationQueueItem, run_worker};
pub use restrict::{RestrictionGate, RestrictionVerdict, TwitterMirrorGate};
pub use store::{AuditEvent, TransformRecord, TransformStore};
