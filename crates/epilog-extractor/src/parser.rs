//! Parse oracle output into a date candidate

use crate::error::ExtractorError;
use epilog_domain::ConfidenceLabel;
use serde_json::Value;

/// Candidate produced by one oracle response, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCandidate {
    /// Candidate completion date in `YYYY-MM-DD` form; `None` is the
    /// oracle's explicit absence marker
    pub completion_date: Option<String>,

    /// Oracle-reported confidence; absent labels default to low
    pub confidence: ConfidenceLabel,

    /// Supporting sentence quoted from the document, if any
    pub evidence: Option<String>,
}

impl DateCandidate {
    /// Whether the oracle found a date at all
    pub fn found(&self) -> bool {
        self.completion_date.is_some()
    }
}

/// Parse an oracle JSON response into a date candidate
///
/// LLMs sometimes wrap JSON in markdown code blocks, so fences are
/// stripped first. The payload must be a single JSON object.
pub fn parse_oracle_response(response: &str) -> Result<DateCandidate, ExtractorError> {
    let json_str = strip_fences(response)?;

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| ExtractorError::InvalidFormat(format!("JSON parse error: {}", e)))?;

    let obj = json
        .as_object()
        .ok_or_else(|| ExtractorError::InvalidFormat("Expected JSON object".to_string()))?;

    let completion_date = match obj.get("completion_date") {
        None => {
            return Err(ExtractorError::InvalidFormat(
                "Missing 'completion_date'".to_string(),
            ))
        }
        Some(Value::Null) => None,
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            // Some models spell out the absence marker instead of null
            if trimmed.is_empty()
                || trimmed.eq_ignore_ascii_case("null")
                || trimmed.eq_ignore_ascii_case("none")
                || trimmed.eq_ignore_ascii_case("not_found")
            {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Some(other) => {
            return Err(ExtractorError::InvalidFormat(format!(
                "'completion_date' must be a string or null, got {}",
                other
            )))
        }
    };

    let confidence = obj
        .get("confidence")
        .and_then(|v| v.as_str())
        .and_then(ConfidenceLabel::parse)
        .unwrap_or(ConfidenceLabel::Low);

    let evidence = obj
        .get("evidence")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    Ok(DateCandidate {
        completion_date,
        confidence,
        evidence,
    })
}

/// Strip markdown code fences from a response, if present
fn strip_fences(response: &str) -> Result<String, ExtractorError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```json") || trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(ExtractorError::InvalidFormat("Empty code block".to_string()));
        }

        // Skip first line (```json or ```) and last line (```)
        let json_lines = &lines[1..lines.len().saturating_sub(1)];
        Ok(json_lines.join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}
