use crate::errors::EmbeddingError;

/// Opaque text-to-vector provider.
///
/// Any failure, including timeouts, is an `EmbeddingError`; callers degrade
/// instead of surfacing it to the end user.
pub trait IEmbeddingProvider: Send + Sync {
    /// Embed a single text, returning a vector of floats.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// The dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;

    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Whether this provider is currently available.
    fn is_available(&self) -> bool;
}
