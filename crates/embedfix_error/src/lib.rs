//! Error types for the embedfix link rewrite bot.
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use embedfix_error::{EmbedfixResult, HttpError};
//!
//! fn fetch_data() -> EmbedfixResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod database;
mod error;
mod gateway;
mod http;

pub use config::ConfigError;
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{EmbedfixError, EmbedfixErrorKind, EmbedfixResult};
pub use gateway::{GatewayError, GatewayErrorKind, GatewayResult};
pub use http::HttpError;
