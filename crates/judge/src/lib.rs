//! Judging for Silent Investigator.
//!
//! - [`ResponseGrader`] scores a predicted [`StructuredResult`] against an
//!   expected one with a fixed point scheme.
//! - [`parse_structured_output`] turns raw model text into a result.
//! - [`judge_outcome`] combines both and never fails: generator errors and
//!   unparseable text become zero-score verdicts.
//!
//! [`StructuredResult`]: investigator_core::result::StructuredResult

pub mod grader;
pub mod parse;
pub mod rubric;
pub mod verdict;

pub use grader::{GradeResult, GradingRules, ItemDetail, ResponseGrader, grade};
pub use parse::{ParseError, parse_structured_output};
pub use rubric::{JUDGE_RUBRIC, judge_prompt};
pub use verdict::{Verdict, judge_outcome, judge_text};
