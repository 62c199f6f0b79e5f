//! Epilog Extractor
//!
//! Converts one (task, document) pair into a validated extraction
//! outcome using the date oracle.
//!
//! # Architecture
//!
//! ```text
//! Document text → KeywordFilter → Prompt → DateOracle → Parser → DateGate → ExtractionOutcome
//! ```
//!
//! The keyword pre-filter bounds the expensive-call volume; the gate
//! rejects dates that violate domain ordering (completion before the
//! anchor), downgrading them to failed outcomes with a distinct reason
//! instead of dropping them silently.
//!
//! # Example Usage
//!
//! ```no_run
//! use epilog_extractor::{DateExtractor, ExtractorConfig};
//! use epilog_llm::MockOracle;
//!
//! let oracle = MockOracle::new(r#"{"completion_date": "2024-03-01", "confidence": "high"}"#);
//! let extractor = DateExtractor::new(oracle, ExtractorConfig::default());
//! // extractor.extract(&task, &document, text).await yields an ExtractionOutcome
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod gate;
mod keyword;
mod parser;
mod prompt;

pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::DateExtractor;
pub use gate::{DateGate, GateConfig, RejectionReason};
pub use keyword::{CompletionKeywordFilter, KeywordFilter};
pub use parser::{parse_oracle_response, DateCandidate};
pub use prompt::DatePromptBuilder;
