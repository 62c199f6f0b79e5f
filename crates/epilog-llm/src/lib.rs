//! Epilog Oracle Provider Layer
//!
//! Pluggable implementations of the `DateOracle` trait from
//! `epilog-domain`.
//!
//! # Providers
//!
//! - `MockOracle`: Deterministic mock for testing
//! - `OllamaOracle`: Local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use epilog_llm::MockOracle;
//! use epilog_domain::traits::DateOracle;
//!
//! let oracle = MockOracle::new(r#"{"completion_date": null, "confidence": "low"}"#);
//! let response = oracle.extract("test prompt").unwrap();
//! assert!(response.contains("completion_date"));
//! ```

#![warn(missing_docs)]

pub mod ollama;

use epilog_domain::traits::DateOracle as DateOracleTrait;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use ollama::OllamaOracle;

/// Errors that can occur during oracle operations
#[derive(Error, Debug)]
pub enum OracleError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the oracle backend
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("Oracle error: {0}")]
    Other(String),
}

/// Mock oracle for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// Because production prompts embed whole document texts, responses are
/// keyed by a *substring* of the prompt (typically a document marker)
/// rather than the exact prompt; the first matching key wins.
///
/// # Examples
///
/// ```
/// use epilog_llm::MockOracle;
/// use epilog_domain::traits::DateOracle;
///
/// let mut oracle = MockOracle::new("default");
/// oracle.add_response("doc-001", "matched");
/// assert_eq!(oracle.extract("... text of doc-001 ...").unwrap(), "matched");
/// assert_eq!(oracle.extract("something else").unwrap(), "default");
/// assert_eq!(oracle.call_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockOracle {
    default_response: String,
    responses: Arc<Mutex<Vec<(String, String)>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockOracle {
    /// Create a mock that returns a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Add a response for any prompt containing `needle`
    pub fn add_response(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push((needle.into(), response.into()));
    }

    /// Configure an error for any prompt containing `needle`
    pub fn add_error(&mut self, needle: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push((needle.into(), "ERROR".to_string()));
    }

    /// Number of times `extract` was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap() = 0;
    }
}

impl Default for MockOracle {
    fn default() -> Self {
        Self::new(r#"{"completion_date": null, "confidence": "low"}"#)
    }
}

impl DateOracleTrait for MockOracle {
    type Error = OracleError;

    fn extract(&self, prompt: &str) -> Result<String, Self::Error> {
        *self.call_count.lock().unwrap() += 1;

        let responses = self.responses.lock().unwrap();
        for (needle, response) in responses.iter() {
            if prompt.contains(needle) {
                if response == "ERROR" {
                    return Err(OracleError::Other("Mock error".to_string()));
                }
                return Ok(response.clone());
            }
        }

        Ok(self.default_response.clone())
    }
}
