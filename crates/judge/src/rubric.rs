//! Rubric prompt for grading with a model instead of the point scheme.
//!
//! Rendering is pure; sending the prompt is up to the caller.

use investigator_core::result::StructuredResult;

pub const JUDGE_RUBRIC: &str = "\
You are grading a document investigation. Compare the PREDICTED result with the EXPECTED result.
Both follow the schema {missing_fields: [...], summary: string, remediation_steps: [...]}.
Score each expected missing field:
  - 0.6 if a predicted field has the same name (ignoring case)
  - 0.2 more if its evidence_span or required_information partially matches
Add up to 0.2 in total for summary and remediation alignment.
Divide by the maximum possible points and cap at 1.0. A score of 0.8 or more passes.
Reply with ONLY a JSON object with keys:
  - score: number between 0.0 and 1.0
  - pass: boolean
  - details: one entry per expected missing field explaining the match or mismatch
";

/// Render the rubric followed by both results as canonical JSON.
pub fn judge_prompt(predicted: &StructuredResult, expected: &StructuredResult) -> String {
    format!(
        "{JUDGE_RUBRIC}\nEXPECTED:\n{}\n\nPREDICTED:\n{}\n",
        expected.to_canonical_json(),
        predicted.to_canonical_json()
    )
}
