use super::{EmbeddingError, RetrievalError, StorageError};

/// Top-level error for every crate in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum KbError {
    #[error("dialog not found: {id}")]
    DialogNotFound { id: String },

    #[error("solution not found: {id}")]
    SolutionNotFound { id: String },

    #[error("validation failed: {reason}")]
    Validation { reason: String },

    #[error("template error: {reason}")]
    Template { reason: String },

    #[error("config error: {reason}")]
    Config { reason: String },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl KbError {
    /// Whether this error came from the embedding provider. Callers degrade to
    /// keyword scoring on these instead of failing the request.
    pub fn is_embedding_failure(&self) -> bool {
        matches!(self, Self::Embedding(_))
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }
}

pub type KbResult<T> = Result<T, KbError>;
