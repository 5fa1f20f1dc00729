//! Top-level error wrapper types.

use crate::{ConfigError, DatabaseError, GatewayError, HttpError};

/// Union of all error domains in the embedfix workspace.
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum EmbedfixErrorKind {
    /// HTTP error (probing, config service)
    #[from(HttpError)]
    Http(HttpError),
    /// Database error
    #[from(DatabaseError)]
    Database(DatabaseError),
    /// Messaging gateway error
    #[from(GatewayError)]
    Gateway(GatewayError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Embedfix error with kind discrimination.
///
/// # Examples
///
/// ```
/// use embedfix_error::{EmbedfixResult, ConfigError};
///
/// fn might_fail() -> EmbedfixResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Embedfix Error: {}", _0)]
pub struct EmbedfixError(Box<EmbedfixErrorKind>);

impl EmbedfixError {
    /// Create a new error from a kind.
    pub fn new(kind: EmbedfixErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &EmbedfixErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to EmbedfixErrorKind
impl<T> From<T> for EmbedfixError
where
    T: Into<EmbedfixErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for embedfix operations.
pub type EmbedfixResult<T> = std::result::Result<T, EmbedfixError>;
