//! Core DateExtractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::gate::{DateGate, GateConfig};
use crate::parser::parse_oracle_response;
use crate::prompt::DatePromptBuilder;
use epilog_domain::traits::DateOracle;
use epilog_domain::{DocumentRef, ExtractionOutcome, FailureKind, SearchTask, Verdict};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Converts one (task, document) pair into a validated outcome
///
/// Every failure mode (oracle error, timeout, unparsable payload, gate
/// rejection) is converted into a failed [`ExtractionOutcome`] at this
/// boundary rather than propagated, so one bad call can never abort a
/// batch or deadlock a worker pool.
pub struct DateExtractor<L>
where
    L: DateOracle,
{
    oracle: Arc<L>,
    gate: DateGate,
    config: ExtractorConfig,
}

impl<L> DateExtractor<L>
where
    L: DateOracle + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a new extractor
    pub fn new(oracle: L, config: ExtractorConfig) -> Self {
        let gate = DateGate::new(GateConfig {
            max_days_after_anchor: config.max_days_after_anchor,
        });
        Self {
            oracle: Arc::new(oracle),
            gate,
            config,
        }
    }

    /// Run one extraction attempt
    pub async fn extract(
        &self,
        task: &SearchTask,
        document: &DocumentRef,
        text: &str,
    ) -> ExtractionOutcome {
        let start = Instant::now();

        let truncated = truncate_chars(text, self.config.max_document_chars);
        let prompt = DatePromptBuilder::new(task, document, truncated).build();

        debug!(
            episode = %task.episode_id,
            document = %document.document_id,
            prompt_chars = prompt.len(),
            "Submitting extraction"
        );

        let verdict = match self.call_oracle(&prompt).await {
            Ok(response) => self.interpret(&response, task, document),
            Err(e) => {
                warn!(
                    episode = %task.episode_id,
                    document = %document.document_id,
                    "Oracle call failed: {}",
                    e
                );
                Verdict::Failed {
                    kind: FailureKind::OracleCall,
                    message: e.to_string(),
                }
            }
        };

        ExtractionOutcome {
            episode_id: task.episode_id.clone(),
            document_id: document.document_id.clone(),
            tier_label: task.tier_label.clone(),
            elapsed: start.elapsed(),
            verdict,
        }
    }

    /// Parse and gate an oracle response
    fn interpret(&self, response: &str, task: &SearchTask, document: &DocumentRef) -> Verdict {
        let candidate = match parse_oracle_response(response) {
            Ok(candidate) => candidate,
            Err(e) => {
                warn!(
                    document = %document.document_id,
                    "Unparsable oracle response: {}",
                    e
                );
                return Verdict::Failed {
                    kind: FailureKind::InvalidResponse,
                    message: e.to_string(),
                };
            }
        };

        let Some(raw_date) = candidate.completion_date else {
            return Verdict::NothingFound;
        };

        match self.gate.validate(&raw_date, task) {
            Ok(date) => Verdict::Accepted {
                date,
                confidence: candidate.confidence,
            },
            Err(reason) => {
                debug!(
                    episode = %task.episode_id,
                    document = %document.document_id,
                    "Candidate rejected: {}",
                    reason
                );
                Verdict::Failed {
                    kind: FailureKind::Validation,
                    message: reason.to_string(),
                }
            }
        }
    }

    /// Call the oracle on a blocking thread, with a timeout
    async fn call_oracle(&self, prompt: &str) -> Result<String, ExtractorError> {
        let oracle = Arc::clone(&self.oracle);
        let prompt = prompt.to_string();

        let call = tokio::task::spawn_blocking(move || {
            oracle
                .extract(&prompt)
                .map_err(|e| ExtractorError::Oracle(e.to_string()))
        });

        match timeout(self.config.oracle_timeout(), call).await {
            Err(_) => Err(ExtractorError::Timeout),
            Ok(Err(join_err)) => Err(ExtractorError::Oracle(format!(
                "Task join error: {}",
                join_err
            ))),
            Ok(Ok(result)) => result,
        }
    }
}

/// Truncate to a character budget without splitting a UTF-8 boundary
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
