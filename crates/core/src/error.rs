//! Error types for the Silent Investigator domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all investigator operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Retrieval errors ---
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    // --- Generation errors ---
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- I/O ---
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures of the vector store and its embedding collaborator.
///
/// An empty store is not an error: retrieval simply returns no hits.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RetrievalError {
    /// No embedding function is bound to the store. Fatal; fix the setup.
    #[error("No embedding function configured for this vector store")]
    NotConfigured,

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedder returned {actual} vectors for {expected} texts")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Embedding generation failed: {0}")]
    EmbeddingFailed(String),
}

/// Failures of the generation collaborator.
///
/// These are carried as values inside
/// [`GenerationOutcome::Failed`](crate::generator::GenerationOutcome) so a
/// batch run keeps going when one call fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Generator not configured: {0}")]
    NotConfigured(String),
}

impl GenerationError {
    /// A short stable tag for reports and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredentials(_) => "missing_credentials",
            Self::ApiError { .. } => "api_error",
            Self::RateLimited { .. } => "rate_limited",
            Self::Timeout(_) => "timeout",
            Self::Network(_) => "network",
            Self::MalformedResponse(_) => "malformed_response",
            Self::NotConfigured(_) => "not_configured",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_error_displays_correctly() {
        let err = Error::Generation(GenerationError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn dimension_mismatch_names_both_sizes() {
        let err = Error::from(RetrievalError::DimensionMismatch {
            expected: 384,
            actual: 3,
        });
        let text = err.to_string();
        assert!(text.contains("384"));
        assert!(text.contains('3'));
    }

    #[test]
    fn generation_error_kinds_are_stable() {
        assert_eq!(
            GenerationError::MissingCredentials("GEMINI_API_KEY".into()).kind(),
            "missing_credentials"
        );
        assert_eq!(GenerationError::Timeout("30s".into()).kind(), "timeout");
    }
}
