//! Verdicts over generation outcomes.

use investigator_core::generator::GenerationOutcome;
use investigator_core::result::StructuredResult;
use serde::Serialize;
use tracing::debug;

use crate::grader::{GradeResult, ResponseGrader};
use crate::parse::parse_structured_output;

/// The result of judging one model answer.
///
/// Failed generations and unparseable output are distinct from a real
/// zero score, but all three count as 0 and never pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    Graded(GradeResult),
    GenerationFailed { kind: String, message: String },
    Unparseable { reason: String },
}

impl Verdict {
    pub fn score(&self) -> f64 {
        match self {
            Self::Graded(g) => g.score,
            _ => 0.0,
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self, Self::Graded(g) if g.pass)
    }

    pub fn grade(&self) -> Option<&GradeResult> {
        match self {
            Self::Graded(g) => Some(g),
            _ => None,
        }
    }
}

/// Judge raw model text against `expected`.
pub fn judge_text(grader: &ResponseGrader, raw: &str, expected: &StructuredResult) -> Verdict {
    match parse_structured_output(raw) {
        Ok(predicted) => Verdict::Graded(grader.grade(&predicted, expected)),
        Err(e) => {
            debug!(error = %e, "Model output could not be parsed");
            Verdict::Unparseable {
                reason: e.to_string(),
            }
        }
    }
}

/// Judge a generation outcome against `expected`.
pub fn judge_outcome(
    grader: &ResponseGrader,
    outcome: &GenerationOutcome,
    expected: &StructuredResult,
) -> Verdict {
    match outcome {
        GenerationOutcome::Completed(completion) => judge_text(grader, &completion.text, expected),
        GenerationOutcome::Failed(err) => Verdict::GenerationFailed {
            kind: err.kind().to_string(),
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use investigator_core::error::GenerationError;
    use investigator_core::generator::Completion;
    use investigator_core::result::MissingFieldEntry;

    fn expected() -> StructuredResult {
        StructuredResult {
            missing_fields: vec![MissingFieldEntry::named("Owner")],
            summary: "No owner named.".into(),
            remediation_steps: vec![],
        }
    }

    fn completed(text: &str) -> GenerationOutcome {
        GenerationOutcome::Completed(Completion {
            text: text.into(),
            model: "test".into(),
        })
    }

    #[test]
    fn completed_output_is_graded() {
        let raw = r#"{"missing_fields": [{"name": "owner"}], "summary": "No owner named."}"#;
        let verdict = judge_outcome(&ResponseGrader::default(), &completed(raw), &expected());
        let grade = verdict.grade().unwrap();
        assert!(grade.details[0].matched_name);
        assert!((verdict.score() - 0.8 / 1.2).abs() < 1e-9);
        assert!(!verdict.passed());
    }

    #[test]
    fn failed_generation_scores_zero() {
        let outcome = GenerationOutcome::Failed(GenerationError::Timeout("30s".into()));
        let verdict = judge_outcome(&ResponseGrader::default(), &outcome, &expected());
        assert!(matches!(verdict, Verdict::GenerationFailed { ref kind, .. } if kind == "timeout"));
        assert_eq!(verdict.score(), 0.0);
        assert!(!verdict.passed());
    }

    #[test]
    fn error_text_is_unparseable_not_a_crash() {
        let verdict = judge_outcome(
            &ResponseGrader::default(),
            &completed("[GENERATION ERROR] quota exceeded"),
            &expected(),
        );
        assert!(matches!(verdict, Verdict::Unparseable { .. }));
        assert_eq!(verdict.score(), 0.0);
    }

    #[test]
    fn verdict_serializes_with_status_tag() {
        let verdict = Verdict::Unparseable {
            reason: "empty".into(),
        };
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["status"], "unparseable");
        assert_eq!(json["reason"], "empty");
    }
}
