//! Messaging gateway error types.
//!
//! Errors surfaced by the chat-platform gateway. The pipeline only cares
//! about one distinction: permission-denied (degraded fallback, then give
//! up) versus everything else (candidate-local, logged and skipped).

use derive_getters::Getters;

/// Gateway error variants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum GatewayErrorKind {
    /// Bot lacks the required permission for an operation.
    #[display("Insufficient permissions: {_0}")]
    PermissionDenied(String),

    /// Message, channel, or user not found.
    #[display("Not found: {_0}")]
    NotFound(String),

    /// Channel does not support the requested operation (e.g. webhooks).
    #[display("Unsupported channel: {_0}")]
    UnsupportedChannel(String),

    /// Message failed to send.
    #[display("Message send failed: {_0}")]
    SendFailed(String),

    /// Any other platform API error.
    #[display("Platform API error: {_0}")]
    Api(String),
}

/// Gateway error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, Getters)]
#[display("Gateway Error: {} at line {} in {}", kind, line, file)]
pub struct GatewayError {
    kind: GatewayErrorKind,
    line: u32,
    file: &'static str,
}

impl GatewayError {
    /// Create a new GatewayError with automatic location tracking.
    ///
    /// # Example
    /// ```
    /// use embedfix_error::{GatewayError, GatewayErrorKind};
    ///
    /// let err = GatewayError::new(GatewayErrorKind::SendFailed("timeout".into()));
    /// ```
    #[track_caller]
    pub fn new(kind: GatewayErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether this error is a missing-permission failure.
    ///
    /// Permission failures are treated as persistent: the pipeline attempts
    /// one degraded fallback and then abandons the message.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self.kind, GatewayErrorKind::PermissionDenied(_))
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<serenity::Error> for GatewayError {
    #[track_caller]
    fn from(err: serenity::Error) -> Self {
        use serenity::http::HttpError;
        match &err {
            serenity::Error::Http(HttpError::UnsuccessfulRequest(resp))
                if resp.status_code == serenity::http::StatusCode::FORBIDDEN =>
            {
                GatewayError::new(GatewayErrorKind::PermissionDenied(err.to_string()))
            }
            serenity::Error::Model(serenity::model::ModelError::InvalidPermissions { .. }) => {
                GatewayError::new(GatewayErrorKind::PermissionDenied(err.to_string()))
            }
            _ => GatewayError::new(GatewayErrorKind::Api(err.to_string())),
        }
    }
}
