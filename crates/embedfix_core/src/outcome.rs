//! Terminal validation outcomes.

/// Terminal validation outcome for a processed message.
///
/// Every message that enters the validation queue ends in exactly one of
/// these, persisted once under the message id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ValidationStatus {
    /// A candidate URL validated and the side effect was committed.
    #[display("success")]
    Success,
    /// Every candidate failed, or processing was short-circuited.
    #[display("failed")]
    Failed,
}

impl ValidationStatus {
    /// Column value stored in `message_data.validation_status`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Success => "success",
            ValidationStatus::Failed => "failed",
        }
    }
}
