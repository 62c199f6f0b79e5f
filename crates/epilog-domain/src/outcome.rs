//! Extraction outcomes - validated results of one oracle attempt

use crate::confidence::ConfidenceLabel;
use crate::episode::EpisodeId;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::Date;

/// What happened when one document was put to the oracle for one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The oracle produced a date and it passed the validation gate
    Accepted {
        /// The validated completion date
        date: Date,
        /// Oracle-reported confidence
        confidence: ConfidenceLabel,
    },

    /// The oracle explicitly reported that the document holds no
    /// completion date
    NothingFound,

    /// The attempt failed; the reason distinguishes oracle errors,
    /// unparsable responses, and gate rejections
    Failed {
        /// Failure taxonomy member
        kind: FailureKind,
        /// Human-readable reason
        message: String,
    },
}

/// Failure taxonomy for extraction attempts
///
/// `Validation` is deliberately distinct from `NothingFound`: operators
/// must be able to tell "no evidence existed" from "evidence existed but
/// was rejected".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// The oracle call itself errored or timed out
    OracleCall,
    /// The oracle responded but the payload did not parse
    InvalidResponse,
    /// The oracle returned a date that failed the domain gate
    Validation,
}

impl FailureKind {
    /// Get the failure kind as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::OracleCall => "oracle_call",
            FailureKind::InvalidResponse => "invalid_response",
            FailureKind::Validation => "validation",
        }
    }
}

/// Result of one extraction attempt for one task against one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    /// Episode the attempt was made for
    pub episode_id: EpisodeId,

    /// Document the text came from
    pub document_id: String,

    /// Tier label of the originating task
    pub tier_label: String,

    /// Wall-clock time of the attempt
    pub elapsed: Duration,

    /// The validated verdict
    pub verdict: Verdict,
}

impl ExtractionOutcome {
    /// Whether this outcome resolved its episode
    pub fn succeeded(&self) -> bool {
        matches!(self.verdict, Verdict::Accepted { .. })
    }

    /// The failure kind, if this attempt failed
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match &self.verdict {
            Verdict::Failed { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
