use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: String,
        actual: &'static str,
    },
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PaymentError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    pub(crate) fn mismatch(expected: impl Into<String>, actual: &'static str) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            actual,
        }
    }
}

pub type Result<T> = std::result::Result<T, PaymentError>;
