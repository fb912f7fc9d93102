//! Gemini (Generative Language API) generator.
//!
//! Calls `models/{model}:generateContent` with the key in the
//! `x-goog-api-key` header. Text is read from
//! `candidates[0].content.parts[*].text`; older response shapes
//! (`candidates[0].content` or `output[0].content` as a string) are also
//! accepted, and any other well-formed JSON body is returned verbatim.

use std::time::Duration;

use async_trait::async_trait;
use investigator_core::error::GenerationError;
use investigator_core::generator::{Completion, GenerationRequest, Generator};
use serde_json::{Value, json};
use tracing::debug;

use crate::http::{build_client, send_error, success_body};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiGenerator {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl GeminiGenerator {
    /// Create a generator against the public endpoint.
    ///
    /// A missing key is not an error here; each call reports it instead.
    pub fn new(api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            base_url: GEMINI_BASE_URL.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
            client: build_client(timeout),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request_body(request: &GenerationRequest) -> Value {
        let mut generation_config = json!({ "temperature": request.temperature });
        if let Some(max) = request.max_output_tokens {
            generation_config["maxOutputTokens"] = json!(max);
        }

        let mut body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": request.prompt }] }],
            "generationConfig": generation_config,
        });
        if let Some(system) = &request.system {
            body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
        }
        body
    }
}

/// Pull completion text out of a response body.
fn extract_text(data: &Value) -> Option<String> {
    let candidate = data.get("candidates").and_then(|c| c.get(0));

    if let Some(parts) = candidate
        .and_then(|c| c.pointer("/content/parts"))
        .and_then(Value::as_array)
    {
        let text: String = parts
            .iter()
            .filter_map(|p| p.get("text").and_then(Value::as_str))
            .collect();
        return Some(text);
    }

    if let Some(content) = candidate.and_then(|c| c.get("content")).and_then(Value::as_str) {
        return Some(content.to_string());
    }

    data.pointer("/output/0/content")
        .and_then(Value::as_str)
        .map(String::from)
}

#[async_trait]
impl Generator for GeminiGenerator {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<Completion, GenerationError> {
        let Some(api_key) = &self.api_key else {
            return Err(GenerationError::MissingCredentials(
                "set GEMINI_API_KEY or generator.api_key".into(),
            ));
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, request.model);
        debug!(provider = "gemini", model = %request.model, "Sending generation request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&Self::request_body(&request))
            .send()
            .await
            .map_err(send_error)?;

        let body = success_body("gemini", response).await?;
        let data: Value = serde_json::from_str(&body)
            .map_err(|e| GenerationError::MalformedResponse(format!("Failed to parse response: {e}")))?;

        let text = extract_text(&data).unwrap_or(body);
        let model = data
            .get("modelVersion")
            .and_then(Value::as_str)
            .unwrap_or(&request.model)
            .to_string();

        Ok(Completion { text, model })
    }

    async fn health_check(&self) -> Result<bool, GenerationError> {
        Ok(self.api_key.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_server::{client, serve_once};

    fn generator(base_url: &str) -> GeminiGenerator {
        GeminiGenerator::new(Some("g-key".into()), Duration::from_secs(5))
            .with_base_url(base_url)
            .with_client(client())
    }

    #[test]
    fn extracts_parts_text() {
        let data = json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"summary\":" }, { "text": "\"x\"}" }] } }]
        });
        assert_eq!(extract_text(&data).as_deref(), Some("{\"summary\":\"x\"}"));
    }

    #[test]
    fn extracts_legacy_shapes() {
        let candidates = json!({ "candidates": [{ "content": "plain" }] });
        assert_eq!(extract_text(&candidates).as_deref(), Some("plain"));

        let output = json!({ "output": [{ "content": "older" }] });
        assert_eq!(extract_text(&output).as_deref(), Some("older"));

        assert!(extract_text(&json!({ "unexpected": true })).is_none());
    }

    #[test]
    fn request_body_carries_system_and_limits() {
        let mut request = GenerationRequest::new("gemini-1.5-flash", "Find gaps").with_system("Be precise");
        request.max_output_tokens = Some(256);

        let body = GeminiGenerator::request_body(&request);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Find gaps");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be precise");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 256);
    }

    #[tokio::test]
    async fn missing_key_fails_per_call() {
        let generator = GeminiGenerator::new(None, Duration::from_secs(1));
        assert!(!generator.health_check().await.unwrap());

        let err = generator
            .generate(GenerationRequest::new("gemini-1.5-flash", "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::MissingCredentials(_)));
    }

    #[test]
    fn empty_key_counts_as_missing() {
        let generator = GeminiGenerator::new(Some(String::new()), Duration::from_secs(1));
        assert!(generator.api_key.is_none());
    }

    #[tokio::test]
    async fn successful_call_returns_text() {
        let (url, server) = serve_once(
            200,
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"summary\":\"ok\"}"}]}}],"modelVersion":"gemini-1.5-flash-002"}"#,
        )
        .await;

        let completion = generator(&url)
            .generate(GenerationRequest::new("gemini-1.5-flash", "Find gaps"))
            .await
            .unwrap();
        assert_eq!(completion.text, "{\"summary\":\"ok\"}");
        assert_eq!(completion.model, "gemini-1.5-flash-002");

        let raw_request = server.await.unwrap();
        assert!(raw_request.starts_with("POST /models/gemini-1.5-flash:generateContent"));
        assert!(raw_request.to_ascii_lowercase().contains("x-goog-api-key: g-key"));
    }

    #[tokio::test]
    async fn unknown_shape_returns_raw_body() {
        let (url, _server) = serve_once(200, r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).await;
        let completion = generator(&url)
            .generate(GenerationRequest::new("m", "p"))
            .await
            .unwrap();
        assert!(completion.text.contains("blockReason"));
    }

    #[tokio::test]
    async fn rate_limit_is_typed() {
        let (url, _server) = serve_once(429, "{}").await;
        let err = generator(&url)
            .generate(GenerationRequest::new("m", "p"))
            .await
            .unwrap_err();
        assert_eq!(err, GenerationError::RateLimited { retry_after_secs: 5 });
    }

    #[tokio::test]
    async fn server_error_keeps_body() {
        let (url, _server) = serve_once(500, r#"{"error":"boom"}"#).await;
        let err = generator(&url)
            .generate(GenerationRequest::new("m", "p"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::ApiError { status_code: 500, ref message } if message.contains("boom")));
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let (url, _server) = serve_once(200, "not json").await;
        let err = generator(&url)
            .generate(GenerationRequest::new("m", "p"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }
}
