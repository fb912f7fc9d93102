//! Point-based comparison of a predicted result against an expected one.
//!
//! Per expected missing field (max 1.0 each):
//! - +0.6 if any predicted field has the same lowercased name
//! - +0.2 more if the first expected and first predicted entries with that
//!   name both carry a non-empty evidence span and one (lowercased) contains
//!   the other
//!
//! Plus a narrative reserve of 0.2: +0.2 when both summaries start with the
//! same leading tokens, else +0.1 when they share any token. The score is
//! `min(1, points / max_points)` where `max_points = items + 0.2`, so the
//! reserve caps prose credit regardless of item count.

use std::collections::HashSet;

use investigator_core::result::{MissingFieldEntry, StructuredResult};
use serde::{Deserialize, Serialize};

/// Points for finding an expected field by name.
pub const NAME_MATCH_POINTS: f64 = 0.6;
/// Extra points for overlapping evidence on a matched field.
pub const EVIDENCE_POINTS: f64 = 0.2;
/// Maximum points available per expected field.
pub const ITEM_MAX_POINTS: f64 = 1.0;
/// Points reserved for summary/remediation alignment.
pub const NARRATIVE_POINTS: f64 = 0.2;
/// Summary bonus when only some words are shared.
pub const SUMMARY_OVERLAP_POINTS: f64 = 0.1;

/// Tunable parts of the grading scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingRules {
    /// Minimum score for `pass`.
    pub pass_threshold: f64,
    /// Leading summary tokens compared for the full summary bonus.
    pub summary_prefix_tokens: usize,
}

impl Default for GradingRules {
    fn default() -> Self {
        Self {
            pass_threshold: 0.8,
            summary_prefix_tokens: 3,
        }
    }
}

/// How one expected field was graded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDetail {
    /// Expected field name, lowercased
    pub name: String,
    pub matched_name: bool,
    pub evidence_partial: bool,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeResult {
    /// Normalized score in [0, 1]
    pub score: f64,
    pub pass: bool,
    /// Total points, summary bonus included
    pub points: f64,
    pub max_points: f64,
    pub summary_bonus: f64,
    pub details: Vec<ItemDetail>,
}

/// Grades predicted results against expected ones.
#[derive(Debug, Clone, Default)]
pub struct ResponseGrader {
    rules: GradingRules,
}

impl ResponseGrader {
    pub fn new(rules: GradingRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &GradingRules {
        &self.rules
    }

    pub fn grade(&self, predicted: &StructuredResult, expected: &StructuredResult) -> GradeResult {
        let expected_names = lowercase_names(&expected.missing_fields);
        let predicted_names = lowercase_names(&predicted.missing_fields);

        let max_points = expected_names.len() as f64 * ITEM_MAX_POINTS + NARRATIVE_POINTS;
        let mut points = 0.0;
        let mut details = Vec::with_capacity(expected_names.len());

        // Each expected entry is graded on its own, even when names repeat.
        for name in &expected_names {
            let mut detail = ItemDetail {
                name: name.clone(),
                matched_name: false,
                evidence_partial: false,
                points: 0.0,
            };

            if predicted_names.contains(name) {
                detail.matched_name = true;
                detail.points += NAME_MATCH_POINTS;

                let expected_item = first_named(&expected.missing_fields, name);
                let predicted_item = first_named(&predicted.missing_fields, name);
                if let (Some(e), Some(p)) = (expected_item, predicted_item) {
                    if evidence_overlaps(e.evidence_span.as_deref(), p.evidence_span.as_deref()) {
                        detail.evidence_partial = true;
                        detail.points += EVIDENCE_POINTS;
                    }
                }
            }

            points += detail.points;
            details.push(detail);
        }

        let summary_bonus = self.summary_bonus(&expected.summary, &predicted.summary);
        points += summary_bonus;

        let score = if max_points > 0.0 {
            (points / max_points).min(1.0)
        } else {
            1.0
        };

        GradeResult {
            score,
            pass: score >= self.rules.pass_threshold,
            points,
            max_points,
            summary_bonus,
            details,
        }
    }

    fn summary_bonus(&self, expected: &str, predicted: &str) -> f64 {
        if expected.is_empty() || predicted.is_empty() {
            return 0.0;
        }

        let n = self.rules.summary_prefix_tokens;
        let expected_prefix: Vec<&str> = expected.split_whitespace().take(n).collect();
        let predicted_prefix: Vec<&str> = predicted.split_whitespace().take(n).collect();
        if expected_prefix == predicted_prefix {
            return NARRATIVE_POINTS;
        }

        let expected_words: HashSet<&str> = expected.split_whitespace().collect();
        if predicted.split_whitespace().any(|w| expected_words.contains(w)) {
            SUMMARY_OVERLAP_POINTS
        } else {
            0.0
        }
    }
}

/// Grade with the default rules.
pub fn grade(predicted: &StructuredResult, expected: &StructuredResult) -> GradeResult {
    ResponseGrader::default().grade(predicted, expected)
}

fn lowercase_names(fields: &[MissingFieldEntry]) -> Vec<String> {
    fields.iter().map(|f| f.name.to_lowercase()).collect()
}

fn first_named<'a>(fields: &'a [MissingFieldEntry], lower_name: &str) -> Option<&'a MissingFieldEntry> {
    fields.iter().find(|f| f.name.to_lowercase() == lower_name)
}

/// Both spans present and non-empty, and one contains the other (case-insensitive).
fn evidence_overlaps(expected: Option<&str>, predicted: Option<&str>) -> bool {
    let expected = expected.unwrap_or_default().to_lowercase();
    let predicted = predicted.unwrap_or_default().to_lowercase();
    !expected.is_empty()
        && !predicted.is_empty()
        && (expected.contains(&predicted) || predicted.contains(&expected))
}
