//! Error types for model identification.

use thiserror::Error;
use tk_core::TkError;

/// Result type for identification.
pub type IdentResult<T> = Result<T, IdentError>;

/// Errors raised while identifying an FOPDT model.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IdentError {
    /// Dataset cannot be used for identification.
    #[error("Dataset not usable for identification: {what}")]
    InvalidDataset { what: &'static str },

    /// No rule produced a physical `(tau, theta)`.
    #[error("Identification produced no valid model: {what}")]
    ModelInvalid { what: &'static str },

    #[error(transparent)]
    Numeric(#[from] TkError),
}
