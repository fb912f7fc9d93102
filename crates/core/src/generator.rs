//! Generator trait: the abstraction over generative model backends.
//!
//! A Generator sends one prompt to a model and returns its text completion.
//! Failures are typed ([`GenerationError`]) and callers that must not abort
//! (batch evaluation) fold them into a [`GenerationOutcome`] instead of
//! propagating them.
//!
//! Implementations: Gemini, OpenAI-compatible endpoints, scripted mocks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::GenerationError;

/// A single generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The model to use (e.g., "gemini-1.5-flash", "gpt-4o-mini")
    pub model: String,

    /// System instruction sent alongside the prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// The fully assembled prompt text
    pub prompt: String,

    /// Temperature (0.0 = deterministic)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.2
}

impl GenerationRequest {
    /// Create a request with default sampling settings.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: None,
            prompt: prompt.into(),
            temperature: default_temperature(),
            max_output_tokens: None,
        }
    }

    /// Attach a system instruction.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// A successful completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    /// Raw completion text, not yet parsed
    pub text: String,

    /// Which model actually responded
    pub model: String,
}

/// Either a completion or the typed reason the call failed.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Completed(Completion),
    Failed(GenerationError),
}

impl GenerationOutcome {
    /// The completion text, if the call succeeded.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Completed(c) => Some(&c.text),
            Self::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl From<std::result::Result<Completion, GenerationError>> for GenerationOutcome {
    fn from(result: std::result::Result<Completion, GenerationError>) -> Self {
        match result {
            Ok(c) => Self::Completed(c),
            Err(e) => Self::Failed(e),
        }
    }
}

/// The core Generator trait.
///
/// Calls are not retried here; retry and backoff belong to the caller.
#[async_trait]
pub trait Generator: Send + Sync {
    /// A human-readable name for this generator (e.g., "gemini", "openai").
    fn name(&self) -> &str;

    /// Send a request and get the complete text response.
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> std::result::Result<Completion, GenerationError>;

    /// Health check: can we reach the backend?
    async fn health_check(&self) -> std::result::Result<bool, GenerationError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingGenerator;

    #[async_trait]
    impl Generator for FailingGenerator {
        fn name(&self) -> &str {
            "failing"
        }

        async fn generate(
            &self,
            _request: GenerationRequest,
        ) -> std::result::Result<Completion, GenerationError> {
            Err(GenerationError::Network("connection refused".into()))
        }
    }

    #[test]
    fn request_defaults() {
        let req = GenerationRequest::new("gemini-1.5-flash", "Document: ...");
        assert!((req.temperature - 0.2).abs() < f32::EPSILON);
        assert!(req.system.is_none());
        assert!(req.max_output_tokens.is_none());
    }

    #[tokio::test]
    async fn failure_folds_into_outcome() {
        let outcome: GenerationOutcome = FailingGenerator
            .generate(GenerationRequest::new("m", "p"))
            .await
            .into();
        assert!(outcome.is_failed());
        assert!(outcome.text().is_none());
    }

    #[test]
    fn completed_outcome_exposes_text() {
        let outcome = GenerationOutcome::from(Ok::<_, GenerationError>(Completion {
            text: "{}".into(),
            model: "m".into(),
        }));
        assert_eq!(outcome.text(), Some("{}"));
    }
}
