//! Embedder trait: the seam to the text-embedding model.
//!
//! Embedding is synchronous: the store is a pure in-memory computation and
//! the only blocking work is inside the embedder itself.

use crate::error::RetrievalError;

/// Turns texts into vectors of one fixed dimension.
///
/// Implementations must be deterministic for identical input text so that
/// retrieval is reproducible.
pub trait Embedder: Send + Sync {
    /// A human-readable name (e.g., "hashing", "minilm").
    fn name(&self) -> &str;

    /// The dimension of every vector this embedder returns.
    fn dimension(&self) -> usize;

    /// Embed each text, returning one vector per input in the same order.
    fn embed(&self, texts: &[String]) -> std::result::Result<Vec<Vec<f32>>, RetrievalError>;
}
