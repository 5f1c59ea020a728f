use thiserror::Error;

pub type Result<T> = std::result::Result<T, AmortizationError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AmortizationError {
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),
}

impl AmortizationError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        AmortizationError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}
