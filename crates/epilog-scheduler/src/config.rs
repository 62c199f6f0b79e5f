//! Configuration for the scheduler

use serde::{Deserialize, Serialize};

/// Configuration for the scheduler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Bound on concurrent corpus lookups and document fetches
    pub max_concurrent_queries: usize,

    /// Bound on concurrent oracle calls
    pub max_concurrent_extractions: usize,

    /// Documents kept per task after a lookup, top-K by proximity to
    /// the anchor date
    pub max_documents_per_task: usize,
}

impl SchedulerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrent_queries == 0 {
            return Err("max_concurrent_queries must be greater than 0".to_string());
        }
        if self.max_concurrent_extractions == 0 {
            return Err("max_concurrent_extractions must be greater than 0".to_string());
        }
        if self.max_documents_per_task == 0 {
            return Err("max_documents_per_task must be greater than 0".to_string());
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

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_queries: 4,
            max_concurrent_extractions: 4,
            max_documents_per_task: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SchedulerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_limits_rejected() {
        let mut config = SchedulerConfig::default();
        config.max_concurrent_queries = 0;
        assert!(config.validate().is_err());

        let mut config = SchedulerConfig::default();
        config.max_concurrent_extractions = 0;
        assert!(config.validate().is_err());

        let mut config = SchedulerConfig::default();
        config.max_documents_per_task = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SchedulerConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = SchedulerConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.max_concurrent_queries, parsed.max_concurrent_queries);
        assert_eq!(
            config.max_concurrent_extractions,
            parsed.max_concurrent_extractions
        );
        assert_eq!(config.max_documents_per_task, parsed.max_documents_per_task);
    }
}
