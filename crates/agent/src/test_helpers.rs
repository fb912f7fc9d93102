//! Shared test helpers for pipeline tests.

use std::sync::Mutex;

use investigator_core::error::GenerationError;
use investigator_core::generator::{Completion, GenerationRequest, Generator};

/// A generator that replays scripted results in order.
///
/// Calls past the end of the script fail with `MalformedResponse`.
pub struct ScriptedGenerator {
    script: Mutex<Vec<Result<String, GenerationError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new(script: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            script: Mutex::new(script),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Script of successful completions.
    pub fn texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl Generator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<Completion, GenerationError> {
        let index = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len() - 1
        };

        let next = self.script.lock().unwrap().get(index).cloned();
        match next {
            Some(Ok(text)) => Ok(Completion {
                text,
                model: request.model,
            }),
            Some(Err(e)) => Err(e),
            None => Err(GenerationError::MalformedResponse(format!(
                "script exhausted at call #{index}"
            ))),
        }
    }
}
