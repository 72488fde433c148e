//! Error types for controller operations.

use thiserror::Error;

/// Result type for controller operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur in controller operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    /// Integral time is not positive, so the integral term is undefined.
    #[error("Controller singular: Ti = {ti} must be positive")]
    ControllerSingular { ti: f64 },

    /// A gain is NaN or infinite.
    #[error("Non-finite controller gain: {what}")]
    NonFinite { what: &'static str },
}
