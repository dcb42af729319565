mod embedding_error;
mod kb_error;
mod retrieval_error;
mod storage_error;

pub use embedding_error::EmbeddingError;
pub use kb_error::{KbError, KbResult};
pub use retrieval_error::RetrievalError;
pub use storage_error::StorageError;
