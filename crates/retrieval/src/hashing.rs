//! Feature-hashing embedder.
//!
//! A deterministic, offline stand-in for a sentence-embedding model: each
//! lowercase alphanumeric token is hashed with SHA-256 into one of
//! `dimension` buckets, with a hash-derived sign. Texts sharing vocabulary
//! land close together; identical texts always embed identically.

use investigator_core::embedder::Embedder;
use investigator_core::error::RetrievalError;
use sha2::{Digest, Sha256};

/// Default dimension, matching common small sentence encoders.
pub const DEFAULT_DIMENSION: usize = 384;

#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    /// Create an embedder with `dimension` buckets (at least 1).
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dimension];
        for token in tokens(text) {
            let digest = Sha256::digest(token.as_bytes());
            let mut bucket_bytes = [0u8; 8];
            bucket_bytes.copy_from_slice(&digest[..8]);
            let bucket = (u64::from_le_bytes(bucket_bytes) % self.dimension as u64) as usize;
            let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
            v[bucket] += sign;
        }
        v
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

/// Lowercase alphanumeric runs.
fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

impl Embedder for HashingEmbedder {
    fn name(&self) -> &str {
        "hashing"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RetrievalError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}
