//! OpenAI-compatible generator.
//!
//! Works with OpenAI, OpenRouter, Ollama, vLLM and any endpoint exposing
//! `/chat/completions`.

use std::time::Duration;

use async_trait::async_trait;
use investigator_core::error::GenerationError;
use investigator_core::generator::{Completion, GenerationRequest, Generator};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::http::{build_client, send_error, success_body};

/// Providers that run without a key.
const KEYLESS_PROVIDERS: &[&str] = &["ollama", "vllm", "llamacpp"];

pub struct OpenAiCompatGenerator {
    name: String,
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl OpenAiCompatGenerator {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            client: build_client(timeout),
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn requires_key(&self) -> bool {
        !KEYLESS_PROVIDERS.contains(&self.name.as_str())
    }

    fn to_api_messages(request: &GenerationRequest) -> Vec<ApiMessage> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system {
            messages.push(ApiMessage {
                role: "system".into(),
                content: Some(system.clone()),
            });
        }
        messages.push(ApiMessage {
            role: "user".into(),
            content: Some(request.prompt.clone()),
        });
        messages
    }
}

#[async_trait]
impl Generator for OpenAiCompatGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: GenerationRequest) -> Result<Completion, GenerationError> {
        if self.api_key.is_none() && self.requires_key() {
            return Err(GenerationError::MissingCredentials(format!(
                "no API key configured for '{}'",
                self.name
            )));
        }

        let url = format!("{}/chat/completions", self.base_url);

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": Self::to_api_messages(&request),
            "temperature": request.temperature,
            "stream": false,
        });
        if let Some(max_tokens) = request.max_output_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        debug!(provider = %self.name, model = %request.model, "Sending generation request");

        let mut builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {key}"));
        }

        let response = builder.send().await.map_err(send_error)?;
        let body = success_body(&self.name, response).await?;

        let api_response: ApiResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::MalformedResponse(format!("Failed to parse response: {e}")))?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GenerationError::MalformedResponse("No choices in response".into()))?;

        Ok(Completion {
            text: choice.message.content.unwrap_or_default(),
            model: api_response.model.unwrap_or(request.model),
        })
    }

    async fn health_check(&self) -> Result<bool, GenerationError> {
        let url = format!("{}/models", self.base_url);
        let mut builder = self.client.get(&url);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {key}"));
        }
        let response = builder.send().await.map_err(send_error)?;
        Ok(response.status().is_success())
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}
