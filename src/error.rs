//! Error types for the indicator engine

use thiserror::Error;

/// Structural failures that abort a computation.
///
/// Numeric degeneracies (short history, zero ranges) never surface here; they
/// become `None` in the affected row.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    /// No price points were supplied.
    #[error("price series is empty")]
    EmptyInput,

    /// A point lacks a usable numeric value for a required field.
    #[error("point {index} has no numeric {field}")]
    MissingField { index: usize, field: &'static str },

    /// A streamed point does not come strictly after the previous one.
    #[error("point {index} is not after the previous date")]
    OutOfOrder { index: usize },

    /// Engine configuration cannot produce meaningful indicators.
    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, IndicatorError>;
