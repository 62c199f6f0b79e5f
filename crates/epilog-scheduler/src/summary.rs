//! Run summaries: per-tier counters, failure taxonomy, final report

use crate::generate::SkippedEpisode;
use epilog_domain::{ConfidenceLabel, EpisodeId, FailureKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::Date;

/// A validated date with its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDate {
    /// The accepted completion date
    pub date: Date,
    /// Oracle-reported confidence
    pub confidence: ConfidenceLabel,
    /// Tier the evidence came from
    pub tier_label: String,
    /// Document the evidence came from
    pub document_id: String,
}

/// Terminal state of one episode after the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionStatus {
    /// A validated date was found
    Resolved(ResolvedDate),
    /// All scheduled tiers were exhausted without an accepted date;
    /// a normal batch outcome, not an error
    Unresolved {
        /// Number of tiers that were actually searched
        tiers_exhausted: usize,
    },
}

/// Final per-episode entry in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeResolution {
    /// The episode
    pub episode_id: EpisodeId,
    /// Its terminal state
    pub status: ResolutionStatus,
}

impl EpisodeResolution {
    /// Whether this episode was resolved
    pub fn is_resolved(&self) -> bool {
        matches!(self.status, ResolutionStatus::Resolved(_))
    }
}

/// Summary of one processed tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSummary {
    /// Tier number, 1-based
    pub tier: u8,
    /// Tier label
    pub label: String,
    /// Extraction attempts made in this tier
    pub attempted: usize,
    /// Episodes resolved in this tier
    pub resolved: usize,
    /// Wall-clock time spent on this tier
    pub elapsed: Duration,
}

/// Aggregate counts of each failure taxonomy member
///
/// These let operators distinguish "no evidence existed" from "evidence
/// existed but was rejected by validation".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureCounts {
    /// Window-group lookup calls that errored (treated as empty)
    pub lookup_batch: usize,
    /// Documents that could not be fetched (skipped)
    pub document_fetch: usize,
    /// Oracle calls that errored or timed out
    pub oracle_call: usize,
    /// Oracle responses that did not parse
    pub invalid_response: usize,
    /// Candidate dates rejected by the validation gate
    pub validation: usize,
}

impl FailureCounts {
    /// Record one extraction failure
    pub fn record(&mut self, kind: FailureKind) {
        match kind {
            FailureKind::OracleCall => self.oracle_call += 1,
            FailureKind::InvalidResponse => self.invalid_response += 1,
            FailureKind::Validation => self.validation += 1,
        }
    }

    /// Total failures across the taxonomy
    pub fn total(&self) -> usize {
        self.lookup_batch
            + self.document_fetch
            + self.oracle_call
            + self.invalid_response
            + self.validation
    }
}

/// Final summary of one scheduler run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Episodes that entered scheduling (parsable anchors)
    pub total_episodes: usize,
    /// Episodes resolved by the run
    pub resolved_count: usize,
    /// Number of tiers actually processed before stopping
    pub tiers_used: usize,
    /// Wall-clock time for the whole run
    pub elapsed: Duration,
    /// One summary per processed tier
    pub tier_summaries: Vec<TierSummary>,
    /// Aggregate failure counters
    pub failures: FailureCounts,
    /// Terminal state per episode, input order
    pub resolutions: Vec<EpisodeResolution>,
    /// Episodes excluded during generation
    pub skipped: Vec<SkippedEpisode>,
}

impl BatchReport {
    /// Look up the resolution for one episode
    pub fn resolution(&self, id: &EpisodeId) -> Option<&EpisodeResolution> {
        self.resolutions.iter().find(|r| &r.episode_id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_counts_record() {
        let mut counts = FailureCounts::default();
        counts.record(FailureKind::OracleCall);
        counts.record(FailureKind::Validation);
        counts.record(FailureKind::Validation);
        counts.lookup_batch += 1;

        assert_eq!(counts.oracle_call, 1);
        assert_eq!(counts.validation, 2);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_report_serializes() {
        let report = BatchReport {
            total_episodes: 1,
            resolved_count: 0,
            tiers_used: 2,
            elapsed: Duration::from_secs(1),
            tier_summaries: vec![],
            failures: FailureCounts::default(),
            resolutions: vec![EpisodeResolution {
                episode_id: EpisodeId::new("ep-1"),
                status: ResolutionStatus::Unresolved { tiers_exhausted: 2 },
            }],
            skipped: vec![],
        };

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("tiers_exhausted"));
    }
}
