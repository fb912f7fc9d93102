//! The in-memory vector store.
//!
//! Holds document texts alongside unit-normalized embeddings, in insertion
//! order. Normalizing once at write time reduces every query to one dot
//! product per stored row.
//!
//! Mutation (`index_documents`, `add_documents`) takes `&mut self` and
//! retrieval takes `&self`, so the borrow checker serializes writers
//! against readers. Callers sharing a store across tasks wrap it in a lock.

use std::sync::Arc;

use investigator_core::embedder::Embedder;
use investigator_core::error::RetrievalError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::vector::{dot, normalize};

/// One ranked retrieval result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalHit {
    /// Position of the document in insertion order.
    pub index: usize,
    /// Cosine similarity to the query.
    pub score: f32,
    /// The stored document text.
    pub document: String,
}

/// Ordered `(document, embedding)` rows, bound to one embedder.
///
/// Invariant: `documents.len() == embeddings.len()`, and every stored row
/// has the store's pinned dimension.
pub struct VectorStore {
    embedder: Option<Arc<dyn Embedder>>,
    documents: Vec<String>,
    embeddings: Vec<Vec<f32>>,
    /// Pinned by the first embedding call; later calls must match.
    dimension: Option<usize>,
}

impl VectorStore {
    /// Create an empty store bound to `embedder`.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder: Some(embedder),
            documents: Vec::new(),
            embeddings: Vec::new(),
            dimension: None,
        }
    }

    /// Create an empty store with no embedder. Writes fail with
    /// [`RetrievalError::NotConfigured`].
    pub fn unbound() -> Self {
        Self {
            embedder: None,
            documents: Vec::new(),
            embeddings: Vec::new(),
            dimension: None,
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// The embedding dimension, once known.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Stored documents in insertion order.
    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    /// The normalized embedding stored for row `index`.
    pub fn embedding(&self, index: usize) -> Option<&[f32]> {
        self.embeddings.get(index).map(Vec::as_slice)
    }

    /// Replace the entire contents with `documents`.
    ///
    /// On error the previous contents are kept.
    pub fn index_documents(&mut self, documents: Vec<String>) -> Result<(), RetrievalError> {
        let embeddings = self.embed_normalized(&documents)?;
        debug!(
            documents = documents.len(),
            dimension = ?self.dimension,
            "Indexed documents (replace)"
        );
        self.documents = documents;
        self.embeddings = embeddings;
        Ok(())
    }

    /// Append `documents` without touching existing rows.
    ///
    /// On an empty store this is the same as [`index_documents`](Self::index_documents).
    pub fn add_documents(&mut self, documents: Vec<String>) -> Result<(), RetrievalError> {
        if self.is_empty() {
            return self.index_documents(documents);
        }

        let embeddings = self.embed_normalized(&documents)?;
        debug!(
            added = documents.len(),
            total = self.documents.len() + documents.len(),
            "Appended documents"
        );
        self.documents.extend(documents);
        self.embeddings.extend(embeddings);
        Ok(())
    }

    /// Return up to `top_k` rows by descending cosine similarity to `query`.
    ///
    /// Ties keep ascending insertion order. An empty store (or `top_k == 0`)
    /// yields no hits without calling the embedder.
    pub fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<RetrievalHit>, RetrievalError> {
        if self.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let (mut rows, _) = self.embed_checked(&[query.to_string()])?;
        let query_vec = rows.pop().ok_or(RetrievalError::CountMismatch {
            expected: 1,
            actual: 0,
        })?;

        let mut scored: Vec<(usize, f32)> = self
            .embeddings
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let score = dot(&query_vec, row);
                (i, if score.is_nan() { f32::NEG_INFINITY } else { score })
            })
            .collect();

        // NaN scores rank last. Stable sort: equal scores stay in index order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_k);

        debug!(top_k, returned = scored.len(), "Retrieved documents");

        Ok(scored
            .into_iter()
            .map(|(index, score)| RetrievalHit {
                index,
                score,
                document: self.documents[index].clone(),
            })
            .collect())
    }

    /// Embed, validate, and normalize rows for a write, pinning the dimension.
    fn embed_normalized(&mut self, texts: &[String]) -> Result<Vec<Vec<f32>>, RetrievalError> {
        let (rows, dimension) = self.embed_checked(texts)?;
        if dimension.is_some() {
            self.dimension = dimension;
        }
        Ok(rows)
    }

    /// Embed `texts`, check shape against the pinned dimension, normalize.
    ///
    /// Returns the rows and the dimension they share (`None` for no texts).
    fn embed_checked(
        &self,
        texts: &[String],
    ) -> Result<(Vec<Vec<f32>>, Option<usize>), RetrievalError> {
        let embedder = self.embedder.as_ref().ok_or(RetrievalError::NotConfigured)?;
        if texts.is_empty() {
            return Ok((Vec::new(), None));
        }

        let mut rows = embedder.embed(texts)?;
        if rows.len() != texts.len() {
            return Err(RetrievalError::CountMismatch {
                expected: texts.len(),
                actual: rows.len(),
            });
        }

        let expected = self.dimension.unwrap_or(rows[0].len());
        if let Some(bad) = rows.iter().find(|r| r.len() != expected) {
            return Err(RetrievalError::DimensionMismatch {
                expected,
                actual: bad.len(),
            });
        }

        for row in rows.iter_mut() {
            normalize(row);
        }
        Ok((rows, Some(expected)))
    }
}

impl std::fmt::Debug for VectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorStore")
            .field("embedder", &self.embedder.as_ref().map(|e| e.name().to_string()))
            .field("documents", &self.documents.len())
            .field("dimension", &self.dimension)
            .finish()
    }
}
