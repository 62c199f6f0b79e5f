//! Task generation: the {episode} × {tier} × {window} cross product

use epilog_domain::episode::parse_iso_date;
use epilog_domain::{EpisodeId, EpisodeInput, SearchTask, TierPlan};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// An episode excluded from the run during generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedEpisode {
    /// Episode that was skipped
    pub id: EpisodeId,
    /// Why it was skipped
    pub reason: String,
}

/// Output of task generation
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// All generated tasks, tier-major order
    pub tasks: Vec<SearchTask>,
    /// Episodes excluded from the run, reported not fatal
    pub skipped: Vec<SkippedEpisode>,
}

/// Generate the full task set for a batch of episodes
///
/// Every episode with a parsable anchor date gets one task per
/// (tier, window) pair; episodes whose anchor does not parse are
/// skipped and reported. Output contains no duplicate
/// `(episode, tier, window)` key.
pub fn generate_tasks(episodes: &[EpisodeInput], plan: &TierPlan) -> GenerationReport {
    let mut parsed = Vec::with_capacity(episodes.len());
    let mut skipped = Vec::new();

    for episode in episodes {
        match parse_iso_date(&episode.anchor_date) {
            Some(anchor) => parsed.push((episode, anchor)),
            None => {
                warn!(
                    episode = %episode.id,
                    anchor = %episode.anchor_date,
                    "Skipping episode with unparsable anchor date"
                );
                skipped.push(SkippedEpisode {
                    id: episode.id.clone(),
                    reason: format!("unparsable anchor date '{}'", episode.anchor_date),
                });
            }
        }
    }

    let mut tasks =
        Vec::with_capacity(parsed.len() * plan.tiers.len() * plan.window_days.len());

    for (tier_idx, tier) in plan.tiers.iter().enumerate() {
        let tier_no = (tier_idx + 1) as u8;
        for &window_days in &plan.window_days {
            for (episode, anchor) in &parsed {
                tasks.push(SearchTask {
                    episode_id: episode.id.clone(),
                    kind: episode.kind,
                    anchor_date: *anchor,
                    keywords: episode.keywords.clone(),
                    tier: tier_no,
                    tier_label: tier.label.clone(),
                    document_kinds: tier.document_kinds.clone(),
                    window_days,
                    priority: tier.weight,
                });
            }
        }
    }

    GenerationReport { tasks, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epilog_domain::{EpisodeKind, TierSpec};
    use epilog_domain::DocumentKind;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn episode(id: &str, anchor: &str) -> EpisodeInput {
        EpisodeInput {
            id: EpisodeId::new(id),
            kind: EpisodeKind::Therapy,
            anchor_date: anchor.to_string(),
            keywords: vec![],
        }
    }

    #[test]
    fn test_full_cross_product() {
        let plan = TierPlan::default();
        let episodes = vec![episode("ep-1", "2024-01-10"), episode("ep-2", "2024-02-01")];

        let report = generate_tasks(&episodes, &plan);

        assert_eq!(
            report.tasks.len(),
            2 * plan.tiers.len() * plan.window_days.len()
        );
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_unparsable_anchor_skipped_and_reported() {
        let plan = TierPlan::default();
        let episodes = vec![episode("ep-1", "2024-01-10"), episode("ep-2", "next Tuesday")];

        let report = generate_tasks(&episodes, &plan);

        assert_eq!(
            report.tasks.len(),
            plan.tiers.len() * plan.window_days.len()
        );
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].id, EpisodeId::new("ep-2"));
        assert!(report.skipped[0].reason.contains("next Tuesday"));
    }

    #[test]
    fn test_no_duplicate_keys() {
        let plan = TierPlan::default();
        let episodes = vec![episode("ep-1", "2024-01-10"), episode("ep-2", "2024-02-01")];

        let report = generate_tasks(&episodes, &plan);

        let keys: HashSet<_> = report.tasks.iter().map(|t| t.key()).collect();
        assert_eq!(keys.len(), report.tasks.len());
    }

    #[test]
    fn test_priority_strictly_decreases_with_tier() {
        let plan = TierPlan::default();
        let report = generate_tasks(&[episode("ep-1", "2024-01-10")], &plan);

        for pair in report.tasks.windows(2) {
            if pair[1].tier > pair[0].tier {
                assert!(pair[1].priority < pair[0].priority);
            }
        }
    }

    #[test]
    fn test_tier_major_order() {
        let plan = TierPlan::default();
        let report = generate_tasks(&[episode("ep-1", "2024-01-10")], &plan);

        let tiers: Vec<u8> = report.tasks.iter().map(|t| t.tier).collect();
        let mut sorted = tiers.clone();
        sorted.sort();
        assert_eq!(tiers, sorted);
    }

    proptest! {
        #[test]
        fn prop_no_duplicate_keys(
            episode_count in 1usize..8,
            tier_count in 1usize..5,
            windows in proptest::collection::hash_set(1u32..400, 1..5),
        ) {
            let episodes: Vec<_> = (0..episode_count)
                .map(|i| episode(&format!("ep-{}", i), "2024-01-10"))
                .collect();
            let tiers: Vec<_> = (0..tier_count)
                .map(|i| TierSpec::new(
                    format!("tier-{}", i + 1),
                    vec![DocumentKind::Note],
                    (tier_count - i) as u32 * 10,
                ))
                .collect();
            let windows: Vec<u32> = windows.into_iter().collect();
            let plan = TierPlan::new(tiers, windows.clone());

            let report = generate_tasks(&episodes, &plan);

            let keys: HashSet<_> = report.tasks.iter().map(|t| t.key()).collect();
            prop_assert_eq!(keys.len(), report.tasks.len());
            prop_assert_eq!(
                report.tasks.len(),
                episode_count * tier_count * windows.len()
            );
        }
    }
}
