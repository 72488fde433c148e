//! Error types for dataset ingestion.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for dataset operations.
pub type DataResult<T> = Result<T, DataError>;

/// Errors that can occur while loading or analysing a dataset.
#[derive(Debug, Error)]
pub enum DataError {
    /// A required array could not be located under any alias.
    #[error("Required array '{field}' not found (available keys: {available})")]
    Schema {
        field: &'static str,
        available: String,
    },

    /// Fewer clean samples than the pipeline needs.
    #[error("Insufficient data: {count} clean samples, at least {required} required")]
    InsufficientData { count: usize, required: usize },

    /// No detectable step in input or output.
    #[error("No valid step: {what} (magnitude {magnitude:e})")]
    InvalidStep { what: &'static str, magnitude: f64 },

    /// The container could not be decoded.
    #[error("Malformed {format} file {path}: {message}")]
    Format {
        format: &'static str,
        path: PathBuf,
        message: String,
    },

    /// The container type is recognised but not supported by this build.
    #[error("Unsupported file format for {path}: {what}")]
    UnsupportedFormat { path: PathBuf, what: &'static str },

    #[error("Failed to read {path}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
