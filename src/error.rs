//! Error types for the kohonet engine

use thiserror::Error;

/// Result type alias for kohonet operations
pub type Result<T> = std::result::Result<T, SomError>;

/// Main error type for the kohonet engine
#[derive(Error, Debug)]
pub enum SomError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Snapshot error: {0}")]
    SnapshotError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
