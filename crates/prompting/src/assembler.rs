//! Prompt assembly.
//!
//! Renders an instruction line naming the strategy, zero or more example
//! blocks (document + canonical 2-space JSON output), and the task block.
//!
//! # Determinism
//!
//! Assembly is pure string formatting: identical inputs always produce
//! identical bytes, so prompts can be golden-tested.

use crate::library::ExampleEntry;
use crate::strategy::Strategy;

/// System instruction sent with every investigation prompt.
pub const SYSTEM_PROMPT: &str = "\
You are Silent Investigator, an automated document investigator.
Role: an analyst who inspects documents for missing, incomplete, or inconsistent information.
Task: identify every required field or fact the document lacks, explain why each is missing, quote the evidence span that shows the gap (if any), estimate your confidence, and recommend concrete remediation steps.
Format: reply with ONLY one JSON object, no surrounding commentary, with keys:
  - missing_fields: list of {name, why_missing, evidence_span, required_information, priority, confidence}
  - summary: one or two plain sentences describing the overall gaps
  - remediation_steps: ordered list of concrete next steps
priority is one of \"low\", \"medium\", \"high\"; confidence is a number between 0.0 and 1.0; evidence_span is a quoted span or null.
Context: use ONLY the provided document. Do not invent facts or sources. If the document does not contain enough information to decide, set required_information to \"insufficient_information\" and confidence to 0.0.
";

/// Placeholder the model replaces with its JSON answer.
pub const OUTPUT_PLACEHOLDER: &str = "<JSON>";

/// Renders the final prompt text.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    /// Upper bound on missing-field entries requested.
    max_items: usize,
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self { max_items: 10 }
    }
}

impl PromptAssembler {
    pub fn new(max_items: usize) -> Self {
        Self { max_items }
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// Assemble instruction, example blocks, and task block.
    pub fn assemble(&self, strategy: Strategy, examples: &[ExampleEntry], document: &str) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "Instruction: Use {} prompting. Find missing or incomplete information in the task \
             document and answer with a single JSON object that follows the schema exactly.\n",
            strategy.label()
        ));

        for (i, example) in examples.iter().enumerate() {
            out.push_str(&format!(
                "\n### Example {} ({})\nDocument:\n{}\nOutput:\n{}\n",
                i + 1,
                example.domain,
                example.document,
                example.expected.to_canonical_json()
            ));
        }

        out.push_str(&format!(
            "\n### Task\nDocument:\n{}\n\nReturn up to {} missing field entries. \
             If nothing is missing, return missing_fields as an empty list.\nOutput:\n{}\n",
            document, self.max_items, OUTPUT_PLACEHOLDER
        ));

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::ExampleLibrary;
    use investigator_core::result::{MissingFieldEntry, StructuredResult};

    #[test]
    fn zero_shot_golden() {
        let prompt = PromptAssembler::new(3).assemble(Strategy::ZeroShot, &[], "Invoice #12.");
        let expected = "Instruction: Use zero-shot prompting. Find missing or incomplete \
                        information in the task document and answer with a single JSON object \
                        that follows the schema exactly.\n\
                        \n\
                        ### Task\n\
                        Document:\n\
                        Invoice #12.\n\
                        \n\
                        Return up to 3 missing field entries. If nothing is missing, return \
                        missing_fields as an empty list.\n\
                        Output:\n\
                        <JSON>\n";
        assert_eq!(prompt, expected);
    }

    #[test]
    fn example_block_uses_two_space_json() {
        let example = ExampleEntry {
            domain: "business".into(),
            document: "Status update.".into(),
            expected: StructuredResult {
                missing_fields: vec![MissingFieldEntry::named("Owner")],
                summary: "No owner.".into(),
                remediation_steps: vec![],
            },
        };
        let prompt = PromptAssembler::default().assemble(Strategy::OneShot, &[example], "Doc");
        assert!(prompt.starts_with("Instruction: Use one-shot prompting."));
        assert!(prompt.contains("### Example 1 (business)\nDocument:\nStatus update.\nOutput:\n{\n  \"missing_fields\": [\n    {\n      \"name\": \"Owner\""));
        assert!(prompt.contains("\"evidence_span\": null"));
    }

    #[test]
    fn blocks_appear_in_order() {
        let lib = ExampleLibrary::builtin();
        let prompt = PromptAssembler::default().assemble(Strategy::MultiShot, &lib.entries, "Target text");
        let first = prompt.find("### Example 1 (medical)").unwrap();
        let second = prompt.find("### Example 2 (business)").unwrap();
        let task = prompt.find("### Task").unwrap();
        assert!(first < second && second < task);
        assert!(prompt.trim_end().ends_with(OUTPUT_PLACEHOLDER));
    }

    #[test]
    fn assembly_is_byte_stable() {
        let lib = ExampleLibrary::builtin();
        let assembler = PromptAssembler::default();
        let a = assembler.assemble(Strategy::MultiShot, &lib.entries, "Same input");
        let b = assembler.assemble(Strategy::MultiShot, &lib.entries, "Same input");
        assert_eq!(a, b);
    }

    #[test]
    fn system_prompt_names_schema_keys() {
        for key in ["missing_fields", "summary", "remediation_steps", "evidence_span"] {
            assert!(SYSTEM_PROMPT.contains(key));
        }
    }
}
