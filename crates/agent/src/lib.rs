//! Investigation pipeline for Silent Investigator.
//!
//! [`Investigator`] runs one document through selection, prompt assembly,
//! generation and parsing. [`Evaluator`] runs a labelled batch through the
//! pipeline and the grader. [`setup`] maps config sections to components.

pub mod evaluation;
pub mod investigator;
pub mod setup;

#[cfg(test)]
mod test_helpers;

pub use evaluation::{CaseReport, EvaluationCase, EvaluationReport, Evaluator, load_cases};
pub use investigator::{Investigation, Investigator, PreparedPrompt};
