use thiserror::Error;

/// Errors that can occur while preparing or running a pairing round
///
/// Input problems are always detected before the deferred-acceptance loop
/// starts; once inputs are validated the loop itself cannot fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchingError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid {field} value: {value:?}")]
    InvalidEnumValue { field: &'static str, value: String },

    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}

impl MatchingError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Whether the error was caused by the caller's data (as opposed to an engine bug)
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::InvariantViolation(_))
    }
}

pub type MatchingResult<T> = Result<T, MatchingError>;
