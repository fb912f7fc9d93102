//! Wiring from [`AppConfig`] sections to pipeline components.

use std::sync::Arc;

use investigator_config::{AppConfig, EmbeddingConfig, JudgeConfig, PromptingConfig};
use investigator_core::embedder::Embedder;
use investigator_core::error::{Error, Result};
use investigator_judge::GradingRules;
use investigator_prompting::{ExampleLibrary, ExampleSelector, PromptAssembler, SelectionPolicy, StrategyConfig};
use investigator_retrieval::HashingEmbedder;
use tracing::info;

pub fn strategy_config(prompting: &PromptingConfig) -> StrategyConfig {
    StrategyConfig {
        zero_shot_below: prompting.zero_shot_below_words,
        multi_shot_from: prompting.multi_shot_from_words,
        one_shot_examples: prompting.one_shot_examples,
        multi_shot_examples: prompting.multi_shot_examples,
    }
}

pub fn grading_rules(judge: &JudgeConfig) -> GradingRules {
    GradingRules {
        pass_threshold: judge.pass_threshold,
        summary_prefix_tokens: judge.summary_prefix_tokens,
    }
}

pub fn embedder(embedding: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    match embedding.kind.as_str() {
        "hashing" => Ok(Arc::new(HashingEmbedder::new(embedding.dimension))),
        other => Err(Error::Config {
            message: format!("unknown embedding kind '{other}'"),
        }),
    }
}

/// The configured library file, or the built-in library.
pub fn load_library(prompting: &PromptingConfig) -> Result<Arc<ExampleLibrary>> {
    let Some(path) = &prompting.library_path else {
        return Ok(ExampleLibrary::builtin());
    };

    let library = ExampleLibrary::from_json_file(path).map_err(|e| Error::Config {
        message: e.to_string(),
    })?;
    info!(path = %path.display(), entries = library.len(), rules = library.rules.len(), "Loaded example library");
    Ok(Arc::new(library))
}

pub fn selector(config: &AppConfig) -> Result<ExampleSelector> {
    let policy: SelectionPolicy = config
        .prompting
        .selection
        .parse()
        .map_err(|message| Error::Config { message })?;

    let selector = ExampleSelector::new(load_library(&config.prompting)?)
        .with_strategy(strategy_config(&config.prompting));

    match policy {
        SelectionPolicy::Keyword => Ok(selector),
        SelectionPolicy::Similarity => Ok(selector.with_similarity(embedder(&config.embedding)?)?),
    }
}

pub fn assembler(prompting: &PromptingConfig) -> PromptAssembler {
    PromptAssembler::new(prompting.max_items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_map_to_component_defaults() {
        let config = AppConfig::default();
        assert_eq!(strategy_config(&config.prompting), StrategyConfig::default());
        assert_eq!(grading_rules(&config.judge), GradingRules::default());
        assert_eq!(assembler(&config.prompting).max_items(), 10);
        assert_eq!(embedder(&config.embedding).unwrap().dimension(), 384);
    }

    #[test]
    fn keyword_selector_by_default() {
        let selector = selector(&AppConfig::default()).unwrap();
        assert_eq!(selector.policy(), SelectionPolicy::Keyword);
        assert_eq!(selector.library().len(), 2);
    }

    #[test]
    fn similarity_selector_from_config() {
        let mut config = AppConfig::default();
        config.prompting.selection = "similarity".into();
        assert_eq!(selector(&config).unwrap().policy(), SelectionPolicy::Similarity);
    }

    #[test]
    fn unknown_policy_is_config_error() {
        let mut config = AppConfig::default();
        config.prompting.selection = "random".into();
        assert!(matches!(selector(&config), Err(Error::Config { .. })));
    }

    #[test]
    fn custom_library_replaces_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");
        std::fs::write(
            &path,
            r#"{
                "rules": [{"domain": "legal", "triggers": ["contract"]}],
                "entries": [{"domain": "legal", "document": "Contract draft.", "expected": {"summary": "Unsigned."}}]
            }"#,
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.prompting.library_path = Some(path);
        let library = load_library(&config.prompting).unwrap();
        assert_eq!(library.len(), 1);
        assert_eq!(library.rules[0].domain, "legal");
    }

    #[test]
    fn missing_library_file_is_config_error() {
        let mut config = AppConfig::default();
        config.prompting.library_path = Some("/nonexistent/library.json".into());
        assert!(matches!(load_library(&config.prompting), Err(Error::Config { .. })));
    }
}
