//! The investigation pipeline.
//!
//! # Flow
//!
//! 1. Choose a strategy from the document's word count
//! 2. Select examples (keyword rules or similarity)
//! 3. Assemble the prompt
//! 4. Generate, folding failures into a [`GenerationOutcome`]
//! 5. Parse the completion into a [`StructuredResult`]
//!
//! Generator failures never abort an investigation; only setup faults
//! (retrieval errors) do.

use std::sync::Arc;

use investigator_config::AppConfig;
use investigator_core::error::{Result, RetrievalError};
use investigator_core::generator::{GenerationOutcome, GenerationRequest, Generator};
use investigator_core::result::StructuredResult;
use investigator_judge::{ParseError, parse_structured_output};
use investigator_prompting::{ExampleEntry, ExampleSelector, PromptAssembler, SYSTEM_PROMPT, Selection, Strategy};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::setup;

/// Selection and prompt for one document, before any generation.
#[derive(Debug, Clone)]
pub struct PreparedPrompt {
    pub selection: Selection,
    pub prompt: String,
}

/// Everything produced while investigating one document.
#[derive(Debug, Clone)]
pub struct Investigation {
    pub selection: Selection,
    pub prompt: String,
    pub outcome: GenerationOutcome,
    /// Parsed model output, when generation succeeded and parsed
    pub result: Option<StructuredResult>,
    pub parse_error: Option<ParseError>,
}

impl Investigation {
    pub fn strategy(&self) -> Strategy {
        self.selection.strategy
    }

    pub fn examples(&self) -> &[ExampleEntry] {
        &self.selection.examples
    }

    /// Report shape printed by the CLI.
    pub fn to_json(&self) -> serde_json::Value {
        let domains: Vec<&str> = self.examples().iter().map(|e| e.domain.as_str()).collect();
        let mut report = json!({
            "strategy": self.strategy(),
            "policy": self.selection.policy,
            "matched_domain": self.selection.matched_domain,
            "examples": domains,
            "result": self.result,
        });
        match &self.outcome {
            GenerationOutcome::Completed(c) => {
                report["model"] = json!(c.model);
                if let Some(e) = &self.parse_error {
                    report["parse_error"] = json!(e.to_string());
                    report["raw_output"] = json!(c.text);
                }
            }
            GenerationOutcome::Failed(e) => {
                report["generation_error"] = json!({ "kind": e.kind(), "message": e.to_string() });
            }
        }
        report
    }
}

pub struct Investigator {
    selector: ExampleSelector,
    assembler: PromptAssembler,
    generator: Arc<dyn Generator>,
    model: String,
    temperature: f32,
    max_output_tokens: Option<u32>,
}

impl Investigator {
    pub fn new(
        selector: ExampleSelector,
        assembler: PromptAssembler,
        generator: Arc<dyn Generator>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            selector,
            assembler,
            generator,
            model: model.into(),
            temperature: 0.2,
            max_output_tokens: None,
        }
    }

    /// Build from config with the given generator.
    pub fn from_config(config: &AppConfig, generator: Arc<dyn Generator>) -> Result<Self> {
        Ok(Self::new(
            setup::selector(config)?,
            setup::assembler(&config.prompting),
            generator,
            config.generator.model.clone(),
        )
        .with_sampling(
            config.generator.temperature,
            Some(config.generator.max_output_tokens),
        ))
    }

    pub fn with_sampling(mut self, temperature: f32, max_output_tokens: Option<u32>) -> Self {
        self.temperature = temperature;
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn selector(&self) -> &ExampleSelector {
        &self.selector
    }

    /// Choose strategy and examples, then assemble the prompt.
    pub fn prepare(&self, document: &str) -> std::result::Result<PreparedPrompt, RetrievalError> {
        let selection = self.selector.select(document)?;
        let prompt = self
            .assembler
            .assemble(selection.strategy, &selection.examples, document);
        Ok(PreparedPrompt { selection, prompt })
    }

    pub async fn investigate(&self, document: &str) -> std::result::Result<Investigation, RetrievalError> {
        let PreparedPrompt { selection, prompt } = self.prepare(document)?;

        let mut request = GenerationRequest::new(&self.model, prompt.clone()).with_system(SYSTEM_PROMPT);
        request.temperature = self.temperature;
        request.max_output_tokens = self.max_output_tokens;

        debug!(
            generator = self.generator.name(),
            model = %self.model,
            strategy = %selection.strategy,
            prompt_chars = prompt.len(),
            "Requesting investigation"
        );

        let outcome = GenerationOutcome::from(self.generator.generate(request).await);

        let (result, parse_error) = match &outcome {
            GenerationOutcome::Completed(completion) => match parse_structured_output(&completion.text) {
                Ok(result) => (Some(result), None),
                Err(e) => {
                    warn!(error = %e, "Model output could not be parsed");
                    (None, Some(e))
                }
            },
            GenerationOutcome::Failed(e) => {
                warn!(kind = e.kind(), error = %e, "Generation failed");
                (None, None)
            }
        };

        if let Some(result) = &result {
            info!(
                strategy = %selection.strategy,
                missing_fields = result.missing_fields.len(),
                "Investigation complete"
            );
        }

        Ok(Investigation {
            selection,
            prompt,
            outcome,
            result,
            parse_error,
        })
    }
}
