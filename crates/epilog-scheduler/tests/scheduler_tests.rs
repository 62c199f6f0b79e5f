//! End-to-end scheduler scenarios against mock collaborators
//!
//! The mocks count every lookup, fetch and oracle call so the tests can
//! assert the scheduling contracts: strict tier order, batch early
//! stop, cache idempotence and the keyword gate.

use epilog_domain::traits::{CorpusIndex, DocumentStore};
use epilog_domain::{
    DocumentKind, DocumentRef, EpisodeId, EpisodeInput, EpisodeKind, SearchTask, TaskKey, TierPlan,
    TierSpec,
};
use epilog_llm::MockOracle;
use epilog_scheduler::{ResolutionStatus, Scheduler, SchedulerConfig};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use time::macros::date;
use time::Date;

/// One recorded lookup call
#[derive(Debug, Clone)]
struct LookupCall {
    tier: u8,
    window_days: u32,
    episodes: Vec<String>,
}

/// Corpus index serving canned documents per episode
///
/// Respects the task's document-kind filter and window radius the way
/// a real index would; clones share state so tests keep a handle after
/// the scheduler takes ownership.
#[derive(Clone, Default)]
struct MockIndex {
    docs: Arc<Mutex<HashMap<String, Vec<DocumentRef>>>>,
    fail_groups: Arc<Mutex<HashSet<(u8, u32)>>>,
    calls: Arc<Mutex<Vec<LookupCall>>>,
}

impl MockIndex {
    fn add_doc(&self, episode: &str, id: &str, doc_date: Date, kind: DocumentKind) {
        self.docs
            .lock()
            .unwrap()
            .entry(episode.to_string())
            .or_default()
            .push(DocumentRef {
                document_id: id.to_string(),
                document_date: doc_date,
                kind,
            });
    }

    fn fail_group(&self, tier: u8, window_days: u32) {
        self.fail_groups.lock().unwrap().insert((tier, window_days));
    }

    fn calls(&self) -> Vec<LookupCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl CorpusIndex for MockIndex {
    type Error = String;

    fn lookup(
        &self,
        tasks: &[SearchTask],
        window_days: u32,
    ) -> Result<HashMap<TaskKey, Vec<DocumentRef>>, String> {
        let tier = tasks.first().map(|t| t.tier).unwrap_or(0);
        self.calls.lock().unwrap().push(LookupCall {
            tier,
            window_days,
            episodes: tasks.iter().map(|t| t.episode_id.to_string()).collect(),
        });

        if self.fail_groups.lock().unwrap().contains(&(tier, window_days)) {
            return Err("index unavailable".to_string());
        }

        let docs = self.docs.lock().unwrap();
        let mut hits = HashMap::new();
        for task in tasks {
            let matching: Vec<DocumentRef> = docs
                .get(task.episode_id.as_str())
                .map(|candidates| {
                    candidates
                        .iter()
                        .filter(|d| task.document_kinds.contains(&d.kind))
                        .filter(|d| d.day_distance(task.anchor_date) <= i64::from(window_days))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            if !matching.is_empty() {
                hits.insert(task.key(), matching);
            }
        }
        Ok(hits)
    }
}

/// Document store with per-id fetch counters and error injection
#[derive(Clone, Default)]
struct MockDocs {
    texts: Arc<Mutex<HashMap<String, String>>>,
    fail_ids: Arc<Mutex<HashSet<String>>>,
    fetch_counts: Arc<Mutex<HashMap<String, usize>>>,
}

impl MockDocs {
    fn add_text(&self, id: &str, text: &str) {
        self.texts
            .lock()
            .unwrap()
            .insert(id.to_string(), text.to_string());
    }

    fn fail(&self, id: &str) {
        self.fail_ids.lock().unwrap().insert(id.to_string());
    }

    fn fetch_count(&self, id: &str) -> usize {
        *self.fetch_counts.lock().unwrap().get(id).unwrap_or(&0)
    }
}

impl DocumentStore for MockDocs {
    type Error = String;

    fn fetch_text(&self, document_id: &str) -> Result<String, String> {
        *self
            .fetch_counts
            .lock()
            .unwrap()
            .entry(document_id.to_string())
            .or_insert(0) += 1;

        if self.fail_ids.lock().unwrap().contains(document_id) {
            return Err("conversion failed".to_string());
        }
        self.texts
            .lock()
            .unwrap()
            .get(document_id)
            .cloned()
            .ok_or_else(|| format!("unknown document {}", document_id))
    }
}

fn episode(id: &str, anchor: &str) -> EpisodeInput {
    EpisodeInput {
        id: EpisodeId::new(id),
        kind: EpisodeKind::Therapy,
        anchor_date: anchor.to_string(),
        keywords: vec![],
    }
}

fn accepted(date: &str) -> String {
    format!(
        r#"{{"completion_date": "{}", "confidence": "high", "evidence": "completed"}}"#,
        date
    )
}

fn four_tier_plan(windows: Vec<u32>) -> TierPlan {
    TierPlan::new(
        vec![
            TierSpec::new("summaries", vec![DocumentKind::Summary], 40),
            TierSpec::new("reports", vec![DocumentKind::Report], 30),
            TierSpec::new("notes", vec![DocumentKind::Note], 20),
            TierSpec::new("correspondence", vec![DocumentKind::Correspondence], 10),
        ],
        windows,
    )
}

fn two_tier_plan(windows: Vec<u32>) -> TierPlan {
    TierPlan::new(
        vec![
            TierSpec::new("summaries", vec![DocumentKind::Summary], 40),
            TierSpec::new("reports", vec![DocumentKind::Report], 30),
        ],
        windows,
    )
}

/// Scenario A: every episode resolves in tier 1, so tiers 2..4 never
/// issue a single lookup or extraction call.
#[tokio::test]
async fn scenario_a_full_tier_one_resolution_stops_batch() {
    let index = MockIndex::default();
    let docs = MockDocs::default();
    let mut oracle = MockOracle::default();

    for (n, doc_date, value) in [
        (1, date!(2024 - 02 - 01), "2024-02-01"),
        (2, date!(2024 - 03 - 20), "2024-03-20"),
        (3, date!(2024 - 05 - 15), "2024-05-15"),
    ] {
        let doc_id = format!("sum-{}", n);
        index.add_doc(&format!("ep-{}", n), &doc_id, doc_date, DocumentKind::Summary);
        docs.add_text(&doc_id, &format!("Therapy completed. [{}]", doc_id));
        oracle.add_response(doc_id, accepted(value));
    }

    let scheduler = Scheduler::new(
        index.clone(),
        docs.clone(),
        oracle.clone(),
        four_tier_plan(vec![30]),
        SchedulerConfig::default(),
    );

    let report = scheduler
        .run(vec![
            episode("ep-1", "2024-01-10"),
            episode("ep-2", "2024-03-05"),
            episode("ep-3", "2024-05-01"),
        ])
        .await
        .unwrap();

    assert_eq!(report.resolved_count, 3);
    assert_eq!(report.total_episodes, 3);
    assert_eq!(report.tiers_used, 1);
    assert_eq!(report.tier_summaries.len(), 1);
    assert_eq!(report.tier_summaries[0].resolved, 3);
    assert!(report.resolutions.iter().all(|r| r.is_resolved()));

    // Tiers 2..4 never ran: every recorded lookup belongs to tier 1
    assert!(index.calls().iter().all(|c| c.tier == 1));
    assert_eq!(index.calls().len(), 1);
    assert_eq!(oracle.call_count(), 3);

    // Provenance points at tier 1
    for resolution in &report.resolutions {
        match &resolution.status {
            ResolutionStatus::Resolved(found) => assert_eq!(found.tier_label, "summaries"),
            other => panic!("expected resolution, got {:?}", other),
        }
    }
}

/// Scenario B: a date before the anchor is a validation failure, the
/// episode stays unresolved after tier 1 and is retried (and resolved)
/// in tier 2.
#[tokio::test]
async fn scenario_b_before_anchor_rejected_and_retried_next_tier() {
    let index = MockIndex::default();
    let docs = MockDocs::default();
    let mut oracle = MockOracle::default();

    index.add_doc("ep-1", "doc-early", date!(2024 - 01 - 05), DocumentKind::Summary);
    index.add_doc("ep-1", "doc-late", date!(2024 - 02 - 05), DocumentKind::Report);
    docs.add_text("doc-early", "Treatment completed. [doc-early]");
    docs.add_text("doc-late", "Treatment completed. [doc-late]");
    // The tier-1 document yields a date before the 2024-01-10 anchor
    oracle.add_response("doc-early", accepted("2024-01-05"));
    oracle.add_response("doc-late", accepted("2024-03-01"));

    let scheduler = Scheduler::new(
        index.clone(),
        docs,
        oracle,
        two_tier_plan(vec![30]),
        SchedulerConfig::default(),
    );

    let report = scheduler
        .run(vec![episode("ep-1", "2024-01-10")])
        .await
        .unwrap();

    assert_eq!(report.failures.validation, 1);
    assert_eq!(report.tier_summaries[0].resolved, 0);
    assert_eq!(report.tiers_used, 2);
    assert_eq!(report.resolved_count, 1);

    match &report.resolutions[0].status {
        ResolutionStatus::Resolved(found) => {
            assert_eq!(found.tier_label, "reports");
            assert_eq!(found.document_id, "doc-late");
            assert_eq!(found.date, date!(2024 - 03 - 01));
        }
        other => panic!("expected resolution, got {:?}", other),
    }
}

/// Scenario C: a lookup failure in one window group of tier 2 is
/// isolated; sibling groups still run and can resolve episodes.
#[tokio::test]
async fn scenario_c_failed_window_group_is_isolated() {
    let index = MockIndex::default();
    let docs = MockDocs::default();
    let mut oracle = MockOracle::default();

    index.add_doc("ep-a", "doc-c", date!(2024 - 01 - 20), DocumentKind::Report);
    docs.add_text("doc-c", "Course completed. [doc-c]");
    oracle.add_response("doc-c", accepted("2024-02-10"));
    index.fail_group(2, 60);

    let scheduler = Scheduler::new(
        index.clone(),
        docs,
        oracle,
        two_tier_plan(vec![30, 60]),
        SchedulerConfig::default(),
    );

    let report = scheduler
        .run(vec![episode("ep-a", "2024-01-10"), episode("ep-b", "2024-01-10")])
        .await
        .unwrap();

    assert_eq!(report.failures.lookup_batch, 1);
    assert!(report.resolution(&EpisodeId::new("ep-a")).unwrap().is_resolved());
    assert!(matches!(
        report.resolution(&EpisodeId::new("ep-b")).unwrap().status,
        ResolutionStatus::Unresolved { tiers_exhausted: 2 }
    ));

    // The failed group was attempted, not skipped
    assert!(index
        .calls()
        .iter()
        .any(|c| c.tier == 2 && c.window_days == 60));
}

/// The same document reached through two episodes in the same tier is
/// fetched exactly once.
#[tokio::test]
async fn cache_fetches_each_document_exactly_once() {
    let index = MockIndex::default();
    let docs = MockDocs::default();
    let mut oracle = MockOracle::default();

    index.add_doc("ep-1", "doc-shared", date!(2024 - 01 - 20), DocumentKind::Summary);
    index.add_doc("ep-2", "doc-shared", date!(2024 - 01 - 20), DocumentKind::Summary);
    docs.add_text("doc-shared", "Both episodes completed. [doc-shared]");
    oracle.add_response("doc-shared", accepted("2024-01-20"));

    let scheduler = Scheduler::new(
        index,
        docs.clone(),
        oracle,
        TierPlan::new(
            vec![TierSpec::new("summaries", vec![DocumentKind::Summary], 40)],
            vec![30, 90],
        ),
        SchedulerConfig::default(),
    );

    let report = scheduler
        .run(vec![episode("ep-1", "2024-01-10"), episode("ep-2", "2024-01-12")])
        .await
        .unwrap();

    assert_eq!(report.resolved_count, 2);
    assert_eq!(docs.fetch_count("doc-shared"), 1);
}

/// A document without any completion-style term never reaches the
/// oracle.
#[tokio::test]
async fn keyword_gate_blocks_oracle_calls() {
    let index = MockIndex::default();
    let docs = MockDocs::default();
    let oracle = MockOracle::default();

    index.add_doc("ep-1", "doc-visit", date!(2024 - 01 - 20), DocumentKind::Summary);
    docs.add_text("doc-visit", "Patient seen in clinic, doing well.");

    let scheduler = Scheduler::new(
        index,
        docs,
        oracle.clone(),
        TierPlan::new(
            vec![TierSpec::new("summaries", vec![DocumentKind::Summary], 40)],
            vec![30],
        ),
        SchedulerConfig::default(),
    );

    let report = scheduler
        .run(vec![episode("ep-1", "2024-01-10")])
        .await
        .unwrap();

    assert_eq!(oracle.call_count(), 0);
    assert_eq!(report.resolved_count, 0);
    assert!(matches!(
        report.resolutions[0].status,
        ResolutionStatus::Unresolved { tiers_exhausted: 1 }
    ));
}

/// Episode-specific keywords are required when present on the task.
#[tokio::test]
async fn keyword_gate_requires_episode_terms() {
    let index = MockIndex::default();
    let docs = MockDocs::default();
    let oracle = MockOracle::default();

    index.add_doc("ep-1", "doc-generic", date!(2024 - 01 - 20), DocumentKind::Summary);
    docs.add_text("doc-generic", "Course completed without issue.");

    let scheduler = Scheduler::new(
        index,
        docs,
        oracle.clone(),
        TierPlan::new(
            vec![TierSpec::new("summaries", vec![DocumentKind::Summary], 40)],
            vec![30],
        ),
        SchedulerConfig::default(),
    );

    let mut ep = episode("ep-1", "2024-01-10");
    ep.keywords = vec!["tamoxifen".to_string()];
    let report = scheduler.run(vec![ep]).await.unwrap();

    assert_eq!(oracle.call_count(), 0);
    assert_eq!(report.resolved_count, 0);
}

/// Once an episode resolves at tier t, no task for it is scheduled at
/// any later tier.
#[tokio::test]
async fn tier_monotonicity_resolved_episode_never_rescheduled() {
    let index = MockIndex::default();
    let docs = MockDocs::default();
    let mut oracle = MockOracle::default();

    index.add_doc("ep-1", "doc-s1", date!(2024 - 01 - 20), DocumentKind::Summary);
    index.add_doc("ep-2", "doc-r2", date!(2024 - 01 - 25), DocumentKind::Report);
    docs.add_text("doc-s1", "Completed. [doc-s1]");
    docs.add_text("doc-r2", "Completed. [doc-r2]");
    oracle.add_response("doc-s1", accepted("2024-01-20"));
    oracle.add_response("doc-r2", accepted("2024-01-25"));

    let scheduler = Scheduler::new(
        index.clone(),
        docs,
        oracle,
        two_tier_plan(vec![30]),
        SchedulerConfig::default(),
    );

    let report = scheduler
        .run(vec![episode("ep-1", "2024-01-10"), episode("ep-2", "2024-01-10")])
        .await
        .unwrap();

    assert_eq!(report.resolved_count, 2);
    assert_eq!(report.tiers_used, 2);

    for call in index.calls().iter().filter(|c| c.tier == 2) {
        assert_eq!(call.episodes, vec!["ep-2".to_string()]);
    }
}

/// A fetch failure marks one document unusable without failing the
/// task; other documents still resolve the episode.
#[tokio::test]
async fn fetch_failure_skips_document_not_episode() {
    let index = MockIndex::default();
    let docs = MockDocs::default();
    let mut oracle = MockOracle::default();

    index.add_doc("ep-1", "doc-broken", date!(2024 - 01 - 12), DocumentKind::Summary);
    index.add_doc("ep-1", "doc-good", date!(2024 - 01 - 25), DocumentKind::Summary);
    docs.fail("doc-broken");
    docs.add_text("doc-good", "Completed. [doc-good]");
    oracle.add_response("doc-good", accepted("2024-01-25"));

    let scheduler = Scheduler::new(
        index,
        docs.clone(),
        oracle,
        TierPlan::new(
            vec![TierSpec::new("summaries", vec![DocumentKind::Summary], 40)],
            vec![30],
        ),
        SchedulerConfig::default(),
    );

    let report = scheduler
        .run(vec![episode("ep-1", "2024-01-10")])
        .await
        .unwrap();

    assert_eq!(report.failures.document_fetch, 1);
    assert_eq!(report.resolved_count, 1);
    assert_eq!(docs.fetch_count("doc-broken"), 1);
}

/// An oracle error on one document is one failed outcome, not a batch
/// failure.
#[tokio::test]
async fn oracle_error_recorded_and_isolated() {
    let index = MockIndex::default();
    let docs = MockDocs::default();
    let mut oracle = MockOracle::default();

    index.add_doc("ep-1", "doc-err", date!(2024 - 01 - 12), DocumentKind::Summary);
    index.add_doc("ep-1", "doc-ok", date!(2024 - 01 - 25), DocumentKind::Summary);
    docs.add_text("doc-err", "Completed. [doc-err]");
    docs.add_text("doc-ok", "Completed. [doc-ok]");
    oracle.add_error("doc-err");
    oracle.add_response("doc-ok", accepted("2024-01-25"));

    let scheduler = Scheduler::new(
        index,
        docs,
        oracle,
        TierPlan::new(
            vec![TierSpec::new("summaries", vec![DocumentKind::Summary], 40)],
            vec![30],
        ),
        SchedulerConfig::default(),
    );

    let report = scheduler
        .run(vec![episode("ep-1", "2024-01-10")])
        .await
        .unwrap();

    assert_eq!(report.failures.oracle_call, 1);
    assert_eq!(report.resolved_count, 1);
}

/// Unparsable anchors are skipped and reported while the rest of the
/// batch proceeds.
#[tokio::test]
async fn unparsable_anchor_skipped_not_fatal() {
    let index = MockIndex::default();
    let docs = MockDocs::default();
    let mut oracle = MockOracle::default();

    index.add_doc("ep-1", "doc-1", date!(2024 - 01 - 20), DocumentKind::Summary);
    docs.add_text("doc-1", "Completed. [doc-1]");
    oracle.add_response("doc-1", accepted("2024-01-20"));

    let scheduler = Scheduler::new(
        index,
        docs,
        oracle,
        TierPlan::new(
            vec![TierSpec::new("summaries", vec![DocumentKind::Summary], 40)],
            vec![30],
        ),
        SchedulerConfig::default(),
    );

    let report = scheduler
        .run(vec![episode("ep-1", "2024-01-10"), episode("ep-bad", "sometime in May")])
        .await
        .unwrap();

    assert_eq!(report.total_episodes, 1);
    assert_eq!(report.resolved_count, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].id, EpisodeId::new("ep-bad"));
}
