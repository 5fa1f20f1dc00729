//! Time-bounded cache for embedfix configuration lookups.
//!
//! One explicit abstraction: `key -> (value, fetched_at)` with a fixed
//! freshness window. Instances are injected into whichever component needs
//! one (guild settings, feature ids); there are no ambient globals.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cache;

pub use cache::{CacheEntry, TtlCache};
