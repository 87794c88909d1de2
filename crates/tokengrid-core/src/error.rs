//! Error types for tokengrid-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid stage: {0}")]
    InvalidStage(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid history: {0}")]
    InvalidHistory(String),

    #[error("Decimal parse error: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
