//! Error types for the extractor

use thiserror::Error;

/// Errors that can occur during a single extraction attempt
///
/// None of these propagate past the worker boundary; the extractor
/// converts them into failed outcomes so one bad call cannot abort a
/// batch.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Oracle call error
    #[error("Oracle error: {0}")]
    Oracle(String),

    /// Oracle call exceeded the configured timeout
    #[error("Oracle call timed out")]
    Timeout,

    /// Oracle response did not match the expected payload shape
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::InvalidFormat(e.to_string())
    }
}
