//! The structured result a model must produce for one document.
//!
//! Field order here is the canonical JSON order used when examples are
//! rendered into prompts, so reordering fields changes prompt bytes.

use serde::{Deserialize, Deserializer, Serialize};

/// How urgently a missing field needs to be filled.
///
/// Serializes lowercase. Deserializing ignores case and maps `null` or any
/// unknown value to [`Priority::Medium`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let label = value.as_str().map(|s| s.trim().to_ascii_lowercase());
        Ok(match label.as_deref() {
            Some("low") => Self::Low,
            Some("high") => Self::High,
            _ => Self::Medium,
        })
    }
}

/// Read `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One gap found in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingFieldEntry {
    /// Field name, compared case-insensitively when grading
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Why the field counts as missing
    #[serde(default, deserialize_with = "null_as_default")]
    pub why_missing: String,

    /// Text span that shows the gap, if any
    #[serde(default)]
    pub evidence_span: Option<String>,

    /// What information would fill the gap
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_information: String,

    #[serde(default)]
    pub priority: Priority,

    /// Model confidence in [0, 1]
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: f64,
}

impl MissingFieldEntry {
    /// Create an entry with just a name; other fields take their defaults.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            why_missing: String::new(),
            evidence_span: None,
            required_information: String::new(),
            priority: Priority::default(),
            confidence: 0.0,
        }
    }

    /// Set the evidence span.
    pub fn with_evidence(mut self, span: impl Into<String>) -> Self {
        self.evidence_span = Some(span.into());
        self
    }
}

/// `{missing_fields, summary, remediation_steps}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub missing_fields: Vec<MissingFieldEntry>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub remediation_steps: Vec<String>,
}

impl StructuredResult {
    /// Render as canonical JSON with 2-space indentation.
    pub fn to_canonical_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Whether the model reported nothing missing.
    pub fn is_complete(&self) -> bool {
        self.missing_fields.is_empty()
    }
}
