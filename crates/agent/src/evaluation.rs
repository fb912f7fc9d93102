//! Offline batch evaluation.
//!
//! Runs every case through the pipeline and the grader. A failed or
//! unparseable generation scores 0 for that case and the run continues.

use std::path::Path;

use chrono::{DateTime, Utc};
use investigator_core::error::{Result, RetrievalError};
use investigator_core::result::StructuredResult;
use investigator_judge::{ResponseGrader, Verdict, judge_outcome};
use investigator_prompting::Strategy;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::investigator::Investigator;

/// One labelled document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationCase {
    pub id: String,
    pub document: String,
    pub expected: StructuredResult,
}

/// Read a JSON array of cases.
pub fn load_cases(path: &Path) -> Result<Vec<EvaluationCase>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub id: String,
    pub strategy: Strategy,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub model: String,
    pub cases: Vec<CaseReport>,
    /// Mean over all cases; 0.0 for an empty run
    pub mean_score: f64,
    pub passed: usize,
    pub generation_failures: usize,
    pub unparseable: usize,
}

impl EvaluationReport {
    fn new(model: &str, started_at: DateTime<Utc>, cases: Vec<CaseReport>) -> Self {
        let total: f64 = cases.iter().map(|c| c.verdict.score()).sum();
        let mean_score = if cases.is_empty() {
            0.0
        } else {
            total / cases.len() as f64
        };
        let count = |f: fn(&Verdict) -> bool| cases.iter().filter(|c| f(&c.verdict)).count();

        Self {
            run_id: Uuid::new_v4(),
            started_at,
            model: model.to_string(),
            mean_score,
            passed: count(Verdict::passed),
            generation_failures: count(|v| matches!(v, Verdict::GenerationFailed { .. })),
            unparseable: count(|v| matches!(v, Verdict::Unparseable { .. })),
            cases,
        }
    }
}

pub struct Evaluator {
    investigator: Investigator,
    grader: ResponseGrader,
}

impl Evaluator {
    pub fn new(investigator: Investigator, grader: ResponseGrader) -> Self {
        Self { investigator, grader }
    }

    /// Evaluate `cases` in order.
    pub async fn run(&self, cases: &[EvaluationCase]) -> std::result::Result<EvaluationReport, RetrievalError> {
        let started_at = Utc::now();
        let mut reports = Vec::with_capacity(cases.len());

        for case in cases {
            let investigation = self.investigator.investigate(&case.document).await?;
            let verdict = judge_outcome(&self.grader, &investigation.outcome, &case.expected);

            info!(
                case = %case.id,
                strategy = %investigation.strategy(),
                score = verdict.score(),
                pass = verdict.passed(),
                "Case evaluated"
            );

            reports.push(CaseReport {
                id: case.id.clone(),
                strategy: investigation.strategy(),
                verdict,
            });
        }

        let report = EvaluationReport::new(self.investigator.model(), started_at, reports);
        info!(
            run_id = %report.run_id,
            cases = report.cases.len(),
            mean_score = report.mean_score,
            passed = report.passed,
            "Evaluation finished"
        );
        Ok(report)
    }
}
