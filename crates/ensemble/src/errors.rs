use combo_core::ComboError;
use thiserror::Error;

/// Errors returned by the ensemble engine.
#[derive(Debug, Error)]
pub enum EnsembleError {
    /// The scorer produced an error outside `[0, 1)`
    #[error("boosting score out of range; got {err}")]
    ErrorOutOfRange { err: f64 },

    #[error("invalid ensemble parameters: {0}")]
    InvalidParameters(String),

    #[error("unsupported ensemble mode: {0}")]
    Unsupported(String),

    /// A row vector does not match the scorer's row count
    #[error("expected {expected} row values, got {found}")]
    WeightLength { expected: usize, found: usize },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Combo(#[from] ComboError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for ensemble operations
pub type Result<T> = std::result::Result<T, EnsembleError>;
