//! Error types for closed-loop simulation.

use thiserror::Error;

/// Errors encountered while assembling or simulating the loop.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid plant model: {what}")]
    InvalidModel { what: &'static str },

    #[error("Closed loop is unstable: {what}")]
    Unstable { what: String },

    #[error(transparent)]
    Lti(#[from] tk_lti::LtiError),
}

pub type SimResult<T> = Result<T, SimError>;
