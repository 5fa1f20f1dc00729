//! PostgreSQL persistence for embedfix.
//!
//! This crate holds the diesel schema, row models, and the repository used
//! by the rewrite pipeline:
//!
//! - `message_data`: system-of-record for every resolved URL, one row per
//!   original message id with insert-once semantics
//! - `audit_logs`: append-only event stream
//! - `embed_configs` / `features`: dashboard-owned rewrite rules, read-only
//!   to the bot
//! - `discord_users` / `discord_channels`: denormalized name lookups for
//!   reporting
//!
//! The schema itself is owned and migrated by the dashboard backend; the bot
//! only connects and queries.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod connection;
mod models;
mod repository;

pub mod schema;

pub use connection::establish_connection;
pub use models::{EmbedConfigRow, NewAuditLog, NewMessageData};
pub use repository::{DbResult, EmbedRepository};
