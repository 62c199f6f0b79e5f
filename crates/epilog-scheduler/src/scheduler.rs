//! The tier scheduler: priority loop, early stopping, result aggregation

use crate::batcher::run_lookups;
use crate::cache::DocumentCache;
use crate::config::SchedulerConfig;
use crate::error::SchedulerError;
use crate::generate::generate_tasks;
use crate::pool::run_bounded;
use crate::summary::{
    BatchReport, EpisodeResolution, FailureCounts, ResolutionStatus, ResolvedDate, TierSummary,
};
use epilog_domain::traits::{CorpusIndex, DateOracle, DocumentStore};
use epilog_domain::{
    DocumentRef, EpisodeId, EpisodeInput, ExtractionOutcome, SearchTask, TierPlan, Verdict,
};
use epilog_extractor::{CompletionKeywordFilter, DateExtractor, ExtractorConfig, KeywordFilter};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Priority-tiered, bounded-concurrency evidence search scheduler
///
/// One instance owns one run's document cache and resolved set. Tiers
/// run strictly sequentially so a higher tier's resolutions are visible
/// before a lower tier generates work; within a tier the lookup phase
/// and the extraction phase each fan out under their own concurrency
/// bound and join before aggregation.
pub struct Scheduler<Q, D, L>
where
    Q: CorpusIndex + Send + Sync + 'static,
    D: DocumentStore + Send + Sync + 'static,
    L: DateOracle + Send + Sync + 'static,
{
    index: Arc<Q>,
    documents: Arc<D>,
    extractor: Arc<DateExtractor<L>>,
    filter: Arc<dyn KeywordFilter>,
    plan: TierPlan,
    config: SchedulerConfig,
}

impl<Q, D, L> Scheduler<Q, D, L>
where
    Q: CorpusIndex + Send + Sync + 'static,
    Q::Error: std::fmt::Display,
    D: DocumentStore + Send + Sync + 'static,
    D::Error: std::fmt::Display,
    L: DateOracle + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a scheduler with default extraction settings
    pub fn new(index: Q, documents: D, oracle: L, plan: TierPlan, config: SchedulerConfig) -> Self {
        Self::with_settings(index, documents, oracle, plan, config, ExtractorConfig::default())
    }

    /// Create a scheduler with explicit extraction settings
    pub fn with_settings(
        index: Q,
        documents: D,
        oracle: L,
        plan: TierPlan,
        config: SchedulerConfig,
        extractor_config: ExtractorConfig,
    ) -> Self {
        Self {
            index: Arc::new(index),
            documents: Arc::new(documents),
            extractor: Arc::new(DateExtractor::new(oracle, extractor_config)),
            filter: Arc::new(CompletionKeywordFilter::default()),
            plan,
            config,
        }
    }

    /// Replace the keyword pre-filter
    pub fn with_keyword_filter(mut self, filter: Arc<dyn KeywordFilter>) -> Self {
        self.filter = filter;
        self
    }

    /// Run the batch to completion
    ///
    /// # Errors
    ///
    /// Fails only before scheduling begins: malformed configuration or
    /// tier plan, or a batch with no usable episode. Everything after
    /// that degrades to counters and failed outcomes.
    pub async fn run(&self, episodes: Vec<EpisodeInput>) -> Result<BatchReport, SchedulerError> {
        self.config
            .validate()
            .map_err(SchedulerError::InvalidConfig)?;
        self.plan.validate().map_err(SchedulerError::InvalidConfig)?;

        if episodes.is_empty() {
            return Err(SchedulerError::EmptyBatch("no episodes in batch".to_string()));
        }

        let generation = generate_tasks(&episodes, &self.plan);
        let skipped_ids: HashSet<&EpisodeId> =
            generation.skipped.iter().map(|s| &s.id).collect();
        let episode_order: Vec<EpisodeId> = episodes
            .iter()
            .map(|e| e.id.clone())
            .filter(|id| !skipped_ids.contains(id))
            .collect();
        let total = episode_order.len();

        if total == 0 {
            return Err(SchedulerError::EmptyBatch(
                "no episode has a parsable anchor date".to_string(),
            ));
        }

        info!(
            episodes = total,
            skipped = generation.skipped.len(),
            tiers = self.plan.tier_count(),
            "Starting tiered search"
        );

        let started = Instant::now();
        let cache = DocumentCache::new();
        let mut resolved: HashSet<EpisodeId> = HashSet::new();
        let mut accepted: HashMap<EpisodeId, ResolvedDate> = HashMap::new();
        let mut failures = FailureCounts::default();
        let mut tier_summaries = Vec::new();
        let mut tiers_used = 0;

        for (tier_idx, tier) in self.plan.tiers.iter().enumerate() {
            let tier_no = (tier_idx + 1) as u8;
            tiers_used = tier_idx + 1;
            let tier_started = Instant::now();

            let live_tasks: Vec<SearchTask> = generation
                .tasks
                .iter()
                .filter(|t| t.tier == tier_no && !resolved.contains(&t.episode_id))
                .cloned()
                .collect();

            info!(
                tier = tier_no,
                label = %tier.label,
                tasks = live_tasks.len(),
                "Processing tier"
            );

            let outcomes = if live_tasks.is_empty() {
                Vec::new()
            } else {
                self.run_tier(live_tasks, &cache, &mut failures).await
            };

            let attempted = outcomes.len();
            let mut resolved_this_tier = 0;

            // Aggregation is single-threaded after the extraction join;
            // the first accepted outcome per episode wins, in completion
            // order
            for outcome in outcomes {
                if let Some(kind) = outcome.failure_kind() {
                    failures.record(kind);
                }
                if let Verdict::Accepted { date, confidence } = outcome.verdict {
                    if resolved.insert(outcome.episode_id.clone()) {
                        accepted.insert(
                            outcome.episode_id,
                            ResolvedDate {
                                date,
                                confidence,
                                tier_label: outcome.tier_label,
                                document_id: outcome.document_id,
                            },
                        );
                        resolved_this_tier += 1;
                    }
                }
            }

            info!(
                tier = tier_no,
                label = %tier.label,
                attempted,
                resolved = resolved_this_tier,
                "Tier complete"
            );

            tier_summaries.push(TierSummary {
                tier: tier_no,
                label: tier.label.clone(),
                attempted,
                resolved: resolved_this_tier,
                elapsed: tier_started.elapsed(),
            });

            if resolved.len() == total {
                info!(tier = tier_no, "All episodes resolved, stopping early");
                break;
            }
        }

        let resolutions = episode_order
            .into_iter()
            .map(|episode_id| {
                let status = match accepted.remove(&episode_id) {
                    Some(found) => ResolutionStatus::Resolved(found),
                    None => ResolutionStatus::Unresolved {
                        tiers_exhausted: tiers_used,
                    },
                };
                EpisodeResolution { episode_id, status }
            })
            .collect::<Vec<_>>();

        let resolved_count = resolved.len();
        info!(
            resolved = resolved_count,
            total,
            tiers_used,
            failures = failures.total(),
            "Search finished"
        );

        Ok(BatchReport {
            total_episodes: total,
            resolved_count,
            tiers_used,
            elapsed: started.elapsed(),
            tier_summaries,
            failures,
            resolutions,
            skipped: generation.skipped,
        })
    }

    /// Run lookup, fetch, filter and extraction for one tier
    async fn run_tier(
        &self,
        live_tasks: Vec<SearchTask>,
        cache: &DocumentCache,
        failures: &mut FailureCounts,
    ) -> Vec<ExtractionOutcome> {
        let batched = run_lookups(
            Arc::clone(&self.index),
            live_tasks,
            self.config.max_concurrent_queries,
            self.config.max_documents_per_task,
        )
        .await;
        failures.lookup_batch += batched.lookup_failures;

        failures.document_fetch += self.fetch_uncached(&batched.per_task, cache).await;

        let mut candidates: Vec<(SearchTask, DocumentRef, String)> = Vec::new();
        for (task, docs) in batched.per_task {
            for doc in docs {
                // Documents without cached text failed to fetch; skip
                let Some(text) = cache.get(&doc.document_id) else {
                    continue;
                };
                if self.filter.admits(&text, &task) {
                    candidates.push((task.clone(), doc, text));
                } else {
                    debug!(
                        episode = %task.episode_id,
                        document = %doc.document_id,
                        "Keyword filter rejected document"
                    );
                }
            }
        }

        debug!(candidates = candidates.len(), "Running extraction phase");

        let extractor = Arc::clone(&self.extractor);
        run_bounded(
            candidates,
            self.config.max_concurrent_extractions,
            move |(task, doc, text): (SearchTask, DocumentRef, String)| {
                let extractor = Arc::clone(&extractor);
                async move { extractor.extract(&task, &doc, &text).await }
            },
        )
        .await
    }

    /// Fetch text for every uncached candidate document, once per id
    ///
    /// Returns the number of fetch failures. Fetching unique ids in a
    /// dedicated phase (rather than inside each extraction worker)
    /// guarantees the document collaborator is called at most once per
    /// id per run.
    async fn fetch_uncached(
        &self,
        per_task: &[(SearchTask, Vec<DocumentRef>)],
        cache: &DocumentCache,
    ) -> usize {
        let mut pending: Vec<String> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for (_, docs) in per_task {
            for doc in docs {
                if seen.insert(&doc.document_id) && !cache.contains(&doc.document_id) {
                    pending.push(doc.document_id.clone());
                }
            }
        }

        if pending.is_empty() {
            return 0;
        }
        debug!(documents = pending.len(), "Fetching uncached documents");

        let documents = Arc::clone(&self.documents);
        let fetched = run_bounded(
            pending,
            self.config.max_concurrent_queries,
            move |document_id: String| {
                let documents = Arc::clone(&documents);
                async move {
                    let id_for_call = document_id.clone();
                    let result = tokio::task::spawn_blocking(move || {
                        documents
                            .fetch_text(&id_for_call)
                            .map_err(|e| e.to_string())
                    })
                    .await
                    .unwrap_or_else(|e| Err(format!("Fetch task join error: {}", e)));
                    (document_id, result)
                }
            },
        )
        .await;

        let mut fetch_failures = 0;
        for (document_id, result) in fetched {
            match result {
                Ok(text) => cache.put(document_id, text),
                Err(e) => {
                    warn!(document = %document_id, "Document fetch failed: {}", e);
                    fetch_failures += 1;
                }
            }
        }
        fetch_failures
    }
}
