//! Discord bot binary crate for embedfix.
//!
//! Binds the abstract pipeline to Discord and Postgres:
//!
//! - **gateway**: [`SerenityGateway`], the serenity-backed
//!   `MessagingGateway` implementation
//! - **store**: [`StoreAdapter`], the diesel-repository-backed
//!   `TransformStore` implementation
//! - **handler**: the serenity `EventHandler` feeding inbound messages to
//!   both platform pipelines
//! - **client**: [`EmbedfixBot`], which wires pipelines, workers, and the
//!   serenity client together
//!
//! The abstract pipeline itself lives in `embedfix_pipeline`; nothing in
//! that crate knows about serenity or diesel.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cli;
mod client;
mod gateway;
mod handler;
mod store;

pub use cli::Cli;
pub use client::EmbedfixBot;
pub use gateway::SerenityGateway;
pub use handler::EmbedfixHandler;
pub use store::StoreAdapter;
