//! Validation gate for candidate completion dates

use epilog_domain::episode::parse_iso_date;
use epilog_domain::SearchTask;
use serde::{Deserialize, Serialize};
use time::Date;

/// Reasons a candidate date is rejected by the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// Candidate did not parse as a `YYYY-MM-DD` date
    Unparsable {
        /// The raw candidate string
        raw: String,
    },

    /// Candidate precedes the episode's anchor date
    BeforeAnchor {
        /// The parsed candidate
        candidate: Date,
        /// The episode anchor
        anchor: Date,
    },

    /// Candidate is implausibly far after the anchor
    BeyondHorizon {
        /// The parsed candidate
        candidate: Date,
        /// The configured horizon in days
        horizon_days: u32,
    },
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectionReason::Unparsable { raw } => {
                write!(f, "candidate '{}' is not a YYYY-MM-DD date", raw)
            }
            RejectionReason::BeforeAnchor { candidate, anchor } => {
                write!(f, "candidate {} is before anchor {}", candidate, anchor)
            }
            RejectionReason::BeyondHorizon {
                candidate,
                horizon_days,
            } => {
                write!(
                    f,
                    "candidate {} is more than {} days after the anchor",
                    candidate, horizon_days
                )
            }
        }
    }
}

/// Configuration for the date gate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Optional plausibility horizon in days after the anchor
    pub max_days_after_anchor: Option<u32>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_days_after_anchor: Some(730),
        }
    }
}

/// The gate validates candidate dates against domain ordering
///
/// A completion date can never precede the episode's anchor date; a
/// candidate failing that check becomes a failed outcome with a
/// validation reason, distinguishable from "oracle found nothing".
#[derive(Debug, Clone)]
pub struct DateGate {
    config: GateConfig,
}

impl DateGate {
    /// Create a gate with the given configuration
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    /// Create a gate with default configuration
    pub fn default_config() -> Self {
        Self::new(GateConfig::default())
    }

    /// Validate a raw candidate against the task's anchor date
    pub fn validate(&self, raw: &str, task: &SearchTask) -> Result<Date, RejectionReason> {
        let candidate = parse_iso_date(raw).ok_or_else(|| RejectionReason::Unparsable {
            raw: raw.to_string(),
        })?;

        if candidate < task.anchor_date {
            return Err(RejectionReason::BeforeAnchor {
                candidate,
                anchor: task.anchor_date,
            });
        }

        if let Some(horizon_days) = self.config.max_days_after_anchor {
            let days_after = (candidate - task.anchor_date).whole_days();
            if days_after > i64::from(horizon_days) {
                return Err(RejectionReason::BeyondHorizon {
                    candidate,
                    horizon_days,
                });
            }
        }

        Ok(candidate)
    }
}
