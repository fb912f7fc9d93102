//! In-memory semantic retrieval for Silent Investigator.
//!
//! Documents are embedded once, unit-normalized at write time, and ranked
//! by a plain dot product at query time.

pub mod hashing;
pub mod store;
pub mod vector;

pub use hashing::HashingEmbedder;
pub use store::{RetrievalHit, VectorStore};
pub use vector::{cosine_similarity, dot, normalize, normalized};
