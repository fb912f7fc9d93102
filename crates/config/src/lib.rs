//! Configuration loading, validation, and management for Silent Investigator.
//!
//! Loads configuration from `~/.silent-investigator/config.toml` with
//! environment variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Selection policies understood by `prompting.selection`.
pub const SELECTION_POLICIES: &[&str] = &["keyword", "similarity"];

/// Embedders understood by `embedding.kind`.
pub const EMBEDDING_KINDS: &[&str] = &["hashing"];

/// The root configuration structure.
///
/// Maps directly to `~/.silent-investigator/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Generative model settings
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Embedding model settings
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Strategy thresholds and example selection
    #[serde(default)]
    pub prompting: PromptingConfig,

    /// Grading rules
    #[serde(default)]
    pub judge: JudgeConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Backend name: "gemini", "openai", "openrouter", "ollama", or a custom
    /// name combined with `api_url`
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// API key (environment variables are preferred)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider() -> String {
    "gemini".into()
}
fn default_model() -> String {
    "gemini-1.5-flash".into()
}
fn default_temperature() -> f32 {
    0.2
}
fn default_max_output_tokens() -> u32 {
    512
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_url: None,
            api_key: None,
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .field("api_key", &redact(&self.api_key))
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_kind")]
    pub kind: String,

    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

fn default_embedding_kind() -> String {
    "hashing".into()
}
fn default_dimension() -> usize {
    384
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            kind: default_embedding_kind(),
            dimension: default_dimension(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptingConfig {
    /// Documents with fewer words than this are zero-shot
    #[serde(default = "default_zero_shot_below")]
    pub zero_shot_below_words: usize,

    /// Documents with at least this many words are multi-shot
    #[serde(default = "default_multi_shot_from")]
    pub multi_shot_from_words: usize,

    #[serde(default = "default_one_shot_examples")]
    pub one_shot_examples: usize,

    #[serde(default = "default_multi_shot_examples")]
    pub multi_shot_examples: usize,

    /// Upper bound on missing-field entries requested from the model
    #[serde(default = "default_max_items")]
    pub max_items: usize,

    /// "keyword" or "similarity"
    #[serde(default = "default_selection")]
    pub selection: String,

    /// JSON file replacing the built-in example library
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_path: Option<PathBuf>,
}

fn default_zero_shot_below() -> usize {
    20
}
fn default_multi_shot_from() -> usize {
    100
}
fn default_one_shot_examples() -> usize {
    1
}
fn default_multi_shot_examples() -> usize {
    2
}
fn default_max_items() -> usize {
    10
}
fn default_selection() -> String {
    "keyword".into()
}

impl Default for PromptingConfig {
    fn default() -> Self {
        Self {
            zero_shot_below_words: default_zero_shot_below(),
            multi_shot_from_words: default_multi_shot_from(),
            one_shot_examples: default_one_shot_examples(),
            multi_shot_examples: default_multi_shot_examples(),
            max_items: default_max_items(),
            selection: default_selection(),
            library_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeConfig {
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: f64,

    /// Leading summary tokens that must match for the full summary bonus
    #[serde(default = "default_summary_prefix_tokens")]
    pub summary_prefix_tokens: usize,
}

fn default_pass_threshold() -> f64 {
    0.8
}
fn default_summary_prefix_tokens() -> usize {
    3
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            pass_threshold: default_pass_threshold(),
            summary_prefix_tokens: default_summary_prefix_tokens(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.silent-investigator/config.toml).
    ///
    /// Also checks environment variables:
    /// - `INVESTIGATOR_API_KEY` (highest priority), `GEMINI_API_KEY`, `OPENAI_API_KEY`
    /// - `INVESTIGATOR_PROVIDER`, `INVESTIGATOR_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup` (usually `std::env::var`).
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.generator.api_key.is_none() {
            self.generator.api_key = lookup("INVESTIGATOR_API_KEY")
                .or_else(|| lookup("GEMINI_API_KEY"))
                .or_else(|| lookup("OPENAI_API_KEY"));
        }

        if let Some(provider) = lookup("INVESTIGATOR_PROVIDER") {
            self.generator.provider = provider;
        }

        if let Some(model) = lookup("INVESTIGATOR_MODEL") {
            self.generator.model = model;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".silent-investigator")
    }

    /// Get the configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generator.temperature < 0.0 || self.generator.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "generator.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.embedding.dimension == 0 {
            return Err(ConfigError::ValidationError(
                "embedding.dimension must be > 0".into(),
            ));
        }

        if !EMBEDDING_KINDS.contains(&self.embedding.kind.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "embedding.kind must be one of {EMBEDDING_KINDS:?}, got '{}'",
                self.embedding.kind
            )));
        }

        if self.prompting.zero_shot_below_words > self.prompting.multi_shot_from_words {
            return Err(ConfigError::ValidationError(
                "prompting.zero_shot_below_words must be <= prompting.multi_shot_from_words"
                    .into(),
            ));
        }

        if !SELECTION_POLICIES.contains(&self.prompting.selection.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "prompting.selection must be one of {SELECTION_POLICIES:?}, got '{}'",
                self.prompting.selection
            )));
        }

        if !(0.0..=1.0).contains(&self.judge.pass_threshold) {
            return Err(ConfigError::ValidationError(
                "judge.pass_threshold must be between 0.0 and 1.0".into(),
            ));
        }

        if self.judge.summary_prefix_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "judge.summary_prefix_tokens must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.generator.api_key.is_some()
    }

    /// Generate a default config TOML string (for the `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
