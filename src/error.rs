use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed or missing input. Reported to the caller, never retried.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// The external generation pipeline failed; nothing was persisted.
    #[error("generation pipeline error: {0}")]
    Dependency(String),

    /// A write referenced an unknown entity; the store is left unchanged.
    #[error("consistency error: {0}")]
    Consistency(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl EngineError {
    pub fn validation(message: impl Into<String>) -> Self {
        EngineError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        EngineError::NotFound(message.into())
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
