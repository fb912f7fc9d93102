//! End-to-end integration tests for Silent Investigator.
//!
//! These tests exercise the full pipeline from a config file and a document
//! to a parsed result and a graded evaluation report, with a scripted
//! generator standing in for the model.

use std::sync::{Arc, Mutex};

use investigator_agent::{EvaluationCase, Evaluator, Investigator, setup};
use investigator_config::AppConfig;
use investigator_core::error::GenerationError;
use investigator_core::generator::{Completion, GenerationRequest, Generator};
use investigator_core::result::{MissingFieldEntry, StructuredResult};
use investigator_judge::{ResponseGrader, Verdict, grade, parse_structured_output};
use investigator_prompting::{ExampleLibrary, Strategy};
use investigator_retrieval::{HashingEmbedder, VectorStore};

// ── Mock Generator ───────────────────────────────────────────────────────

/// Replays scripted results and records every prompt it receives.
struct ScriptedGenerator {
    script: Mutex<Vec<Result<String, GenerationError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    fn new(script: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            script: Mutex::new(script),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn text(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Generator for ScriptedGenerator {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<Completion, GenerationError> {
        let call = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(request.prompt.clone());
            prompts.len() - 1
        };
        let script = self.script.lock().unwrap();
        let Some(next) = script.get(call).cloned() else {
            panic!("ScriptedGenerator exhausted: call #{call}, have {}", script.len());
        };
        next.map(|text| Completion {
            text,
            model: request.model,
        })
    }
}

fn medical_document() -> String {
    // Between 20 and 100 words: one-shot
    "Patient Name: John Doe. Visit Date: 2024-05-10. Symptoms: headache and dizziness for three days. \
     Plan: ordered blood work and advised hydration. Follow up is recommended if the symptoms persist next week."
        .to_string()
}

fn expected_medical() -> StructuredResult {
    StructuredResult {
        missing_fields: vec![
            MissingFieldEntry::named("Patient Date of Birth").with_evidence("Patient Name: John Doe."),
            MissingFieldEntry::named("Attending Physician"),
        ],
        summary: "The visit note lacks identifiers and a clinician.".into(),
        remediation_steps: vec!["Record the date of birth".into()],
    }
}

const GOOD_ANSWER: &str = r#"Here is the result:
```json
{
  "missing_fields": [
    {"name": "patient date of birth", "why_missing": "only a name", "evidence_span": "John Doe", "required_information": "DOB", "priority": "high", "confidence": 0.9},
    {"name": "Attending Physician", "why_missing": "unsigned", "evidence_span": null, "required_information": "Name", "priority": "medium", "confidence": 0.7}
  ],
  "summary": "The visit note lacks a date of birth and a physician.",
  "remediation_steps": ["Ask the patient for a date of birth"]
}
```"#;

// ── Pipeline ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_config_file_to_parsed_result() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[generator]\nmodel = \"scripted-model\"\n\n[prompting]\nmax_items = 4\n",
    )
    .unwrap();
    let config = AppConfig::load_from(&path).unwrap();

    let generator = Arc::new(ScriptedGenerator::text(GOOD_ANSWER));
    let investigator = Investigator::from_config(&config, generator.clone()).unwrap();
    let investigation = investigator.investigate(&medical_document()).await.unwrap();

    assert_eq!(investigation.strategy(), Strategy::OneShot);
    assert_eq!(investigation.examples().len(), 1);
    assert_eq!(investigation.examples()[0].domain, "medical");

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Use one-shot prompting"));
    assert!(prompts[0].contains("### Example 1 (medical)"));
    assert!(prompts[0].contains("Return up to 4 missing field entries"));
    assert!(prompts[0].contains("John Doe"));

    let result = investigation.result.unwrap();
    assert_eq!(result.missing_fields.len(), 2);
    assert_eq!(result.remediation_steps.len(), 1);
}

#[tokio::test]
async fn e2e_parsed_output_gets_partial_credit() {
    let predicted = parse_structured_output(GOOD_ANSWER).unwrap();
    let g = grade(&predicted, &expected_medical());

    // Two fields: 0.8 + 0.6, summary prefix "The visit note" +0.2, over 2.2
    assert!((g.points - 1.6).abs() < 1e-9);
    assert!((g.max_points - 2.2).abs() < 1e-9);
    assert!(!g.pass);
    assert!(g.details[0].evidence_partial);
    assert!(!g.details[1].evidence_partial);
}

#[tokio::test]
async fn e2e_evaluation_survives_generator_failures() {
    let generator = Arc::new(ScriptedGenerator::new(vec![
        Ok(GOOD_ANSWER.to_string()),
        Err(GenerationError::RateLimited { retry_after_secs: 5 }),
        Ok("[GENERATION ERROR] upstream unavailable".to_string()),
    ]));

    let config = AppConfig::default();
    let investigator = Investigator::from_config(&config, generator.clone()).unwrap();
    let evaluator = Evaluator::new(investigator, ResponseGrader::new(setup::grading_rules(&config.judge)));

    let cases: Vec<EvaluationCase> = ["first", "second", "third"]
        .iter()
        .map(|id| EvaluationCase {
            id: id.to_string(),
            document: medical_document(),
            expected: expected_medical(),
        })
        .collect();

    let report = evaluator.run(&cases).await.unwrap();
    assert_eq!(report.cases.len(), 3);
    assert!(matches!(report.cases[0].verdict, Verdict::Graded(_)));
    assert!(matches!(report.cases[1].verdict, Verdict::GenerationFailed { .. }));
    assert!(matches!(report.cases[2].verdict, Verdict::Unparseable { .. }));
    assert_eq!(report.generation_failures, 1);
    assert_eq!(report.unparseable, 1);
    assert!(report.mean_score > 0.0);
    assert_eq!(generator.prompts().len(), 3);
}

#[tokio::test]
async fn e2e_similarity_selection_from_config() {
    let mut config = AppConfig::default();
    config.prompting.selection = "similarity".into();

    let generator = Arc::new(ScriptedGenerator::text("{}"));
    let investigator = Investigator::from_config(&config, generator).unwrap();

    let document = "Sprint review: the vendor integration milestone slipped, acceptance testing \
                    has no date, and nobody owns the delivery risk for the release this quarter."
        .to_string();
    let investigation = investigator.investigate(&document).await.unwrap();
    assert_eq!(investigation.strategy(), Strategy::OneShot);
    assert_eq!(investigation.examples()[0].domain, "business");
    assert!(investigation.result.unwrap().is_complete());
}

// ── Retrieval ────────────────────────────────────────────────────────────

#[test]
fn e2e_store_ranks_library_documents() {
    let library = ExampleLibrary::builtin();
    let mut store = VectorStore::new(Arc::new(HashingEmbedder::default()));
    store
        .index_documents(library.entries.iter().map(|e| e.document.clone()).collect())
        .unwrap();

    let hits = store.retrieve("patient symptoms cough fever antibiotics", 2).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].index, 0);
    assert!(hits[0].score >= hits[1].score);

    store
        .add_documents(vec!["Invoice total and payment terms are missing.".into()])
        .unwrap();
    assert_eq!(store.len(), 3);
    let hits = store.retrieve("invoice payment terms", 1).unwrap();
    assert_eq!(hits[0].index, 2);
}
