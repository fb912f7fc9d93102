//! Generator selection from the `[generator]` config section.

use std::sync::Arc;
use std::time::Duration;

use investigator_config::GeneratorConfig;
use investigator_core::error::GenerationError;
use investigator_core::generator::Generator;
use tracing::debug;

use crate::gemini::{GEMINI_BASE_URL, GeminiGenerator};
use crate::openai_compat::OpenAiCompatGenerator;

/// Build the configured generator.
///
/// Unknown provider names need an explicit `api_url`; they are treated as
/// OpenAI-compatible endpoints.
pub fn build_from_config(config: &GeneratorConfig) -> Result<Arc<dyn Generator>, GenerationError> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let name = config.provider.as_str();

    let base_url = match (&config.api_url, default_base_url(name)) {
        (Some(url), _) => url.clone(),
        (None, Some(url)) => url.to_string(),
        (None, None) => {
            return Err(GenerationError::NotConfigured(format!(
                "provider '{name}' has no known endpoint; set generator.api_url"
            )));
        }
    };

    debug!(provider = name, base_url = %base_url, "Building generator");

    let generator: Arc<dyn Generator> = if name == "gemini" {
        Arc::new(GeminiGenerator::new(config.api_key.clone(), timeout).with_base_url(base_url))
    } else {
        Arc::new(OpenAiCompatGenerator::new(
            name,
            base_url,
            config.api_key.clone(),
            timeout,
        ))
    };
    Ok(generator)
}

/// Default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> Option<&'static str> {
    match provider_name {
        "gemini" => Some(GEMINI_BASE_URL),
        "openai" => Some("https://api.openai.com/v1"),
        "openrouter" => Some("https://openrouter.ai/api/v1"),
        "ollama" => Some("http://localhost:11434/v1"),
        "groq" => Some("https://api.groq.com/openai/v1"),
        "together" => Some("https://api.together.xyz/v1"),
        "vllm" => Some("http://localhost:8000/v1"),
        "llamacpp" => Some("http://localhost:8080/v1"),
        _ => None,
    }
}
