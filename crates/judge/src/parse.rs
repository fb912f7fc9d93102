//! Parsing raw model text into a [`StructuredResult`].
//!
//! Models often wrap their JSON in markdown fences or add a sentence before
//! it. Parsing tries the whole (fence-stripped) text first, then the span
//! from the first `{` to the last `}`.

use investigator_core::result::StructuredResult;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Model output is empty")]
    Empty,

    #[error("Model output contains no JSON object")]
    NoJsonObject,

    #[error("Model output is not a valid result object: {0}")]
    InvalidJson(String),
}

/// Parse model output, tolerating code fences and surrounding prose.
pub fn parse_structured_output(raw: &str) -> Result<StructuredResult, ParseError> {
    let text = strip_code_fence(raw.trim());
    if text.is_empty() {
        return Err(ParseError::Empty);
    }

    if let Ok(result) = serde_json::from_str::<StructuredResult>(text) {
        return Ok(result);
    }

    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Err(ParseError::NoJsonObject);
    };
    if end < start {
        return Err(ParseError::NoJsonObject);
    }

    serde_json::from_str::<StructuredResult>(&text[start..=end])
        .map_err(|e| ParseError::InvalidJson(e.to_string()))
}

/// Remove a leading ```` ```lang ```` line and a trailing ```` ``` ````.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}
