//! Qualitative confidence labels reported by the date oracle

use serde::{Deserialize, Serialize};

/// Confidence label attached by the oracle to a candidate date
///
/// The oracle reports a qualitative label rather than a numeric score;
/// the label is carried through to provenance but does not gate
/// acceptance (the validation gate does).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLabel {
    /// The document states the date explicitly
    High,
    /// The date is inferred from strong context
    Medium,
    /// The date is a weak inference
    Low,
}

impl ConfidenceLabel {
    /// Get the label as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLabel::High => "high",
            ConfidenceLabel::Medium => "medium",
            ConfidenceLabel::Low => "low",
        }
    }

    /// Parse a label from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "high" => Some(ConfidenceLabel::High),
            "medium" => Some(ConfidenceLabel::Medium),
            "low" => Some(ConfidenceLabel::Low),
            _ => None,
        }
    }
}

impl std::str::FromStr for ConfidenceLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid confidence label: {}", s))
    }
}
