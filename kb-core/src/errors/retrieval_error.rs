/// Retrieval subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("invalid search options: {reason}")]
    InvalidOptions { reason: String },

    #[error("search failed: {reason}")]
    SearchFailed { reason: String },
}
