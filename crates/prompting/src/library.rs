//! The few-shot example library.
//!
//! Immutable reference data: an ordered list of `(domain, document,
//! expected output)` entries plus an ordered list of keyword rules mapping
//! trigger words to a domain. Rule order is the match priority; entry order
//! is the fallback "mix" order. The built-in library is constructed once per
//! process and shared through `Arc`.

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use investigator_core::result::{MissingFieldEntry, Priority, StructuredResult};
use serde::{Deserialize, Serialize};

/// One worked example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleEntry {
    /// Domain tag (e.g., "medical", "business")
    pub domain: String,
    /// Example document text
    pub document: String,
    /// The output a correct model would produce for `document`
    pub expected: StructuredResult,
}

/// Trigger keywords selecting one domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainRule {
    pub domain: String,
    /// Lowercase substrings; any one triggers the rule
    pub triggers: Vec<String>,
}

impl DomainRule {
    /// Whether any trigger occurs in `document_lower` (already lowercased).
    fn matches(&self, document_lower: &str) -> bool {
        self.triggers
            .iter()
            .any(|t| document_lower.contains(t.to_lowercase().as_str()))
    }
}

/// Ordered examples and ordered domain rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleLibrary {
    #[serde(default)]
    pub rules: Vec<DomainRule>,
    #[serde(default)]
    pub entries: Vec<ExampleEntry>,
}

static BUILTIN: LazyLock<Arc<ExampleLibrary>> = LazyLock::new(|| Arc::new(builtin_library()));

impl ExampleLibrary {
    /// The process-wide built-in library.
    pub fn builtin() -> Arc<Self> {
        Arc::clone(&BUILTIN)
    }

    /// Load a replacement library from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, LibraryError> {
        let content = std::fs::read_to_string(path).map_err(|e| LibraryError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&content).map_err(|e| match e {
            LibraryError::ParseError { reason, .. } => LibraryError::ParseError {
                origin: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Parse a library from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, LibraryError> {
        let library: Self = serde_json::from_str(json).map_err(|e| LibraryError::ParseError {
            origin: "inline".into(),
            reason: e.to_string(),
        })?;
        if library.entries.is_empty() {
            return Err(LibraryError::Empty);
        }
        Ok(library)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first rule (in priority order) triggered by `document`.
    pub fn match_domain(&self, document: &str) -> Option<&DomainRule> {
        let lower = document.to_lowercase();
        self.rules.iter().find(|r| r.matches(&lower))
    }

    /// Entries tagged `domain`, in declared order.
    pub fn entries_for<'a>(&'a self, domain: &'a str) -> impl Iterator<Item = &'a ExampleEntry> + 'a {
        self.entries.iter().filter(move |e| e.domain == domain)
    }
}

/// Library loading errors.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("Failed to read example library at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    /// `origin` is the file path, or "inline" for text input
    #[error("Failed to parse example library ({origin}): {reason}")]
    ParseError { origin: String, reason: String },

    #[error("Example library has no entries")]
    Empty,
}

fn field(
    name: &str,
    why_missing: &str,
    evidence_span: Option<&str>,
    required_information: &str,
    priority: Priority,
    confidence: f64,
) -> MissingFieldEntry {
    MissingFieldEntry {
        name: name.into(),
        why_missing: why_missing.into(),
        evidence_span: evidence_span.map(String::from),
        required_information: required_information.into(),
        priority,
        confidence,
    }
}

fn builtin_library() -> ExampleLibrary {
    ExampleLibrary {
        rules: vec![
            DomainRule {
                domain: "medical".into(),
                triggers: ["patient", "medical", "diagnosis", "symptom", "clinic"]
                    .map(String::from)
                    .to_vec(),
            },
            DomainRule {
                domain: "business".into(),
                triggers: ["project", "team", "milestone", "stakeholder", "budget"]
                    .map(String::from)
                    .to_vec(),
            },
        ],
        entries: vec![
            ExampleEntry {
                domain: "medical".into(),
                document: "Patient Name: Jane Smith. Visit Date: 2024-03-02. Symptoms: \
                           persistent cough for two weeks, mild fever. Plan: prescribed \
                           antibiotics and rest."
                    .into(),
                expected: StructuredResult {
                    missing_fields: vec![
                        field(
                            "Patient Date of Birth",
                            "The header names the patient but gives no age or date of birth.",
                            Some("Patient Name: Jane Smith."),
                            "Date of birth or numeric age",
                            Priority::High,
                            0.9,
                        ),
                        field(
                            "Medication Dosage",
                            "Antibiotics are prescribed without a drug name, dose, or duration.",
                            Some("Plan: prescribed antibiotics and rest."),
                            "Drug name, dose, frequency and course length",
                            Priority::High,
                            0.85,
                        ),
                        field(
                            "Attending Physician",
                            "No clinician is named or signed.",
                            None,
                            "Name and signature of the attending physician",
                            Priority::Medium,
                            0.7,
                        ),
                    ],
                    summary: "The visit note lacks patient identifiers and a complete \
                              prescription."
                        .into(),
                    remediation_steps: vec![
                        "Request the patient's date of birth from registration".into(),
                        "Record the antibiotic name, dose and duration".into(),
                        "Add the attending physician's name and signature".into(),
                    ],
                },
            },
            ExampleEntry {
                domain: "business".into(),
                document: "Project Status Update: The team completed the API integration \
                           milestone this sprint. Next steps: begin user acceptance testing. \
                           Risks: possible vendor delays."
                    .into(),
                expected: StructuredResult {
                    missing_fields: vec![
                        field(
                            "Project Owner",
                            "The update does not say who is accountable for the project.",
                            None,
                            "Name of the project owner or lead",
                            Priority::Medium,
                            0.8,
                        ),
                        field(
                            "Testing Deadline",
                            "User acceptance testing is announced without a date.",
                            Some("Next steps: begin user acceptance testing."),
                            "Target start and end dates for testing",
                            Priority::High,
                            0.85,
                        ),
                        field(
                            "Risk Mitigation",
                            "Vendor delays are listed with no mitigation or owner.",
                            Some("Risks: possible vendor delays."),
                            "Mitigation plan and responsible person for the vendor risk",
                            Priority::Medium,
                            0.75,
                        ),
                    ],
                    summary: "The status update lacks ownership, dates and a risk \
                              mitigation plan."
                        .into(),
                    remediation_steps: vec![
                        "Name the project owner".into(),
                        "Add the testing start and end dates".into(),
                        "Document a mitigation plan for vendor delays".into(),
                    ],
                },
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_is_shared() {
        let a = ExampleLibrary::builtin();
        let b = ExampleLibrary::builtin();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.len(), 2);
        assert_eq!(a.entries[0].domain, "medical");
        assert_eq!(a.entries[1].domain, "business");
    }

    #[test]
    fn rules_match_case_insensitively() {
        let lib = ExampleLibrary::builtin();
        assert_eq!(lib.match_domain("PATIENT has a cough").unwrap().domain, "medical");
        assert_eq!(lib.match_domain("Project status update").unwrap().domain, "business");
        assert!(lib.match_domain("unrelated weather report").is_none());
    }

    #[test]
    fn first_rule_wins_when_both_match() {
        let lib = ExampleLibrary::builtin();
        let rule = lib.match_domain("The project team reviewed patient intake forms").unwrap();
        assert_eq!(rule.domain, "medical");
    }

    #[test]
    fn entries_for_filters_by_domain() {
        let lib = ExampleLibrary::builtin();
        let medical: Vec<_> = lib.entries_for("medical").collect();
        assert_eq!(medical.len(), 1);
        assert_eq!(lib.entries_for("legal").count(), 0);
    }

    #[test]
    fn json_roundtrip_via_file() {
        let lib = ExampleLibrary::builtin();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");
        std::fs::write(&path, serde_json::to_string_pretty(lib.as_ref()).unwrap()).unwrap();

        let loaded = ExampleLibrary::from_json_file(&path).unwrap();
        assert_eq!(&loaded, lib.as_ref());
    }

    #[test]
    fn empty_library_rejected() {
        let err = ExampleLibrary::from_json_str(r#"{"rules": [], "entries": []}"#).unwrap_err();
        assert!(matches!(err, LibraryError::Empty));
    }

    #[test]
    fn parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = ExampleLibrary::from_json_file(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
