//! Search tasks - one unit of search intent

use crate::document::DocumentKind;
use crate::episode::{EpisodeId, EpisodeKind};
use serde::{Deserialize, Serialize};
use time::Date;

/// One unit of search intent: one episode at one tier and one window
///
/// Tasks are generated as the full cross product of {tiers} × {windows}
/// per episode and are read-only input to the pipeline; nothing mutates
/// a task after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTask {
    /// Episode being resolved
    pub episode_id: EpisodeId,

    /// Extraction recipe selector
    pub kind: EpisodeKind,

    /// Known anchor (start) date of the episode
    pub anchor_date: Date,

    /// Episode-specific filter terms (e.g. agent names)
    pub keywords: Vec<String>,

    /// Tier number, 1-based, 1 = searched first
    pub tier: u8,

    /// Human-readable tier label
    pub tier_label: String,

    /// Document kinds acceptable at this tier
    pub document_kinds: Vec<DocumentKind>,

    /// Symmetric search radius around the anchor date, in days
    pub window_days: u32,

    /// Derived ranking key, strictly decreasing with tier number
    pub priority: u32,
}

impl SearchTask {
    /// The demultiplexing key for this task
    pub fn key(&self) -> TaskKey {
        TaskKey {
            episode_id: self.episode_id.clone(),
            tier: self.tier,
            window_days: self.window_days,
        }
    }
}

/// Key identifying a task within a batch: `(episode, tier, window)`
///
/// Lookup results come back keyed by `TaskKey` so concurrent batch calls
/// can be demultiplexed to their originating tasks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskKey {
    /// Episode being resolved
    pub episode_id: EpisodeId,

    /// Tier number, 1-based
    pub tier: u8,

    /// Window size in days
    pub window_days: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn task(episode: &str, tier: u8, window: u32) -> SearchTask {
        SearchTask {
            episode_id: EpisodeId::new(episode),
            kind: EpisodeKind::Therapy,
            anchor_date: date!(2024 - 01 - 10),
            keywords: vec!["carboplatin".to_string()],
            tier,
            tier_label: "summaries".to_string(),
            document_kinds: vec![DocumentKind::Summary],
            window_days: window,
            priority: 40,
        }
    }

    #[test]
    fn test_key_identity() {
        let a = task("ep-1", 1, 30);
        let b = task("ep-1", 1, 30);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_key_distinguishes_dimensions() {
        let base = task("ep-1", 1, 30);
        assert_ne!(base.key(), task("ep-2", 1, 30).key());
        assert_ne!(base.key(), task("ep-1", 2, 30).key());
        assert_ne!(base.key(), task("ep-1", 1, 90).key());
    }
}
