use thiserror::Error;

/// Build-phase failures. Query-time "not found" conditions never surface
/// here: lookups against missing courses degrade to empty results so the
/// advising host can answer "nothing found" instead of failing the request.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Embedding dimension mismatch: source vector has {actual}, expected {expected}")]
    DimensionMismatch { actual: usize, expected: usize },

    #[error("Blend weight alpha must lie in [0, 1], got {0}")]
    InvalidAlpha(f64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
