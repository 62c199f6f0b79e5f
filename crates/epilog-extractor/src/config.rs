//! Configuration for the extractor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Maximum time for a single oracle call (seconds)
    pub oracle_timeout_secs: u64,

    /// Document text is truncated to this many characters before
    /// prompting
    pub max_document_chars: usize,

    /// Optional plausibility horizon: reject candidate dates more than
    /// this many days after the anchor
    pub max_days_after_anchor: Option<u32>,
}

impl ExtractorConfig {
    /// Get the oracle timeout as a Duration
    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_secs(self.oracle_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.oracle_timeout_secs == 0 {
            return Err("oracle_timeout_secs must be greater than 0".to_string());
        }
        if self.max_document_chars == 0 {
            return Err("max_document_chars must be greater than 0".to_string());
        }
        if let Some(days) = self.max_days_after_anchor {
            if days == 0 {
                return Err("max_days_after_anchor must be greater than 0".to_string());
            }
        }
        Ok(())
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            oracle_timeout_secs: 120,
            max_document_chars: 20_000,
            max_days_after_anchor: Some(730),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ExtractorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = ExtractorConfig::default();
        config.oracle_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_document_chars_rejected() {
        let mut config = ExtractorConfig::default();
        config.max_document_chars = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.oracle_timeout_secs, parsed.oracle_timeout_secs);
        assert_eq!(config.max_document_chars, parsed.max_document_chars);
        assert_eq!(config.max_days_after_anchor, parsed.max_days_after_anchor);
    }
}
