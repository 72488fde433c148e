//! Error types for transfer-function operations.

use thiserror::Error;

/// Result type for LTI operations.
pub type LtiResult<T> = Result<T, LtiError>;

/// Errors raised while building or simulating transfer functions.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LtiError {
    /// Invalid argument provided to an LTI function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Denominator is empty or identically zero.
    #[error("Denominator polynomial is zero")]
    ZeroDenominator,

    /// Numerator degree exceeds denominator degree.
    #[error("Improper transfer function: numerator degree {num} > denominator degree {den}")]
    Improper { num: usize, den: usize },

    /// Time vector is not usable as a sampling grid.
    #[error("Invalid time grid: {what}")]
    InvalidTimeGrid { what: &'static str },
}
