//! Error types for the tk-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// provides a unified error interface for frontends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No dataset loaded")]
    NoDataset,

    #[error("No identified model; run identification first")]
    NoModel,

    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Data error: {0}")]
    Data(#[from] tk_data::DataError),

    #[error("Identification error: {0}")]
    Ident(#[from] tk_ident::IdentError),

    #[error("Controller error: {0}")]
    Control(#[from] tk_controls::ControlError),

    #[error("Simulation error: {0}")]
    Sim(#[from] tk_sim::SimError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for tk-app operations.
pub type AppResult<T> = Result<T, AppError>;
