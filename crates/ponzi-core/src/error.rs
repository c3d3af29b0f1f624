//! Model validation errors.

use thiserror::Error;

/// Errors raised while constructing or validating model values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Input text could not be interpreted (empty symbol, unknown range, ...).
    #[error("bad input: {0}")]
    BadInput(String),
    /// Two series that must be aligned have different lengths.
    #[error("{series} has {actual} values, expected {expected}")]
    LengthMismatch {
        series: String,
        expected: usize,
        actual: usize,
    },
}
