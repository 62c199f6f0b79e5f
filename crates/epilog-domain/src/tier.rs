//! Tier module - ordered priority buckets of document kinds

use crate::document::DocumentKind;
use serde::{Deserialize, Serialize};

/// One priority tier: a labelled set of document kinds with a ranking
/// weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSpec {
    /// Human-readable tier label, carried into outcomes and summaries
    pub label: String,

    /// Document kinds acceptable for lookups at this tier
    pub document_kinds: Vec<DocumentKind>,

    /// Ranking weight; must be strictly decreasing across the plan so
    /// task priority strictly decreases with tier number
    pub weight: u32,
}

impl TierSpec {
    /// Create a tier spec
    pub fn new(label: impl Into<String>, document_kinds: Vec<DocumentKind>, weight: u32) -> Self {
        Self {
            label: label.into(),
            document_kinds,
            weight,
        }
    }
}

/// The full search plan: ordered tiers plus the widening window sizes
///
/// Tier 1 (the first entry) is searched first. Every episode gets the
/// full cross product of tiers and window sizes as search tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierPlan {
    /// Tiers in priority order, highest priority first
    pub tiers: Vec<TierSpec>,

    /// Symmetric day-radius window sizes, searched per tier
    pub window_days: Vec<u32>,
}

impl TierPlan {
    /// Create a plan from tiers and window sizes
    pub fn new(tiers: Vec<TierSpec>, window_days: Vec<u32>) -> Self {
        Self { tiers, window_days }
    }

    /// Validate the plan
    ///
    /// A plan is malformed if it has zero tiers, zero windows, a zero
    /// window size, or tier weights that are not strictly decreasing.
    /// Malformed plans abort the run before any scheduling begins.
    pub fn validate(&self) -> Result<(), String> {
        if self.tiers.is_empty() {
            return Err("plan has zero tiers".to_string());
        }
        if self.window_days.is_empty() {
            return Err("plan has zero window sizes".to_string());
        }
        if self.window_days.iter().any(|w| *w == 0) {
            return Err("window sizes must be greater than 0".to_string());
        }
        for pair in self.tiers.windows(2) {
            if pair[1].weight >= pair[0].weight {
                return Err(format!(
                    "tier weights must be strictly decreasing ({} '{}' >= {} '{}')",
                    pair[1].weight, pair[1].label, pair[0].weight, pair[0].label
                ));
            }
        }
        for tier in &self.tiers {
            if tier.document_kinds.is_empty() {
                return Err(format!("tier '{}' has no document kinds", tier.label));
            }
        }
        Ok(())
    }

    /// Number of tiers in the plan
    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }
}

impl Default for TierPlan {
    /// Default four-tier plan, summaries first, with widening windows
    fn default() -> Self {
        Self {
            tiers: vec![
                TierSpec::new("summaries", vec![DocumentKind::Summary], 40),
                TierSpec::new("reports", vec![DocumentKind::Report], 30),
                TierSpec::new("notes", vec![DocumentKind::Note], 20),
                TierSpec::new(
                    "correspondence",
                    vec![DocumentKind::Correspondence, DocumentKind::Note],
                    10,
                ),
            ],
            window_days: vec![30, 90, 180],
        }
    }
}
