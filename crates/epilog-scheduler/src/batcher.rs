//! Query batching: grouped, bounded corpus lookups

use crate::pool::run_bounded;
use epilog_domain::traits::CorpusIndex;
use epilog_domain::{DocumentRef, SearchTask};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of the lookup phase for one tier
#[derive(Debug)]
pub struct BatchedCandidates {
    /// Tasks with their capped candidate documents; tasks with no
    /// documents are omitted (a miss is not an error)
    pub per_task: Vec<(SearchTask, Vec<DocumentRef>)>,

    /// Window groups whose lookup call errored
    pub lookup_failures: usize,
}

/// Run the lookup phase for one tier's live tasks
///
/// Tasks are grouped by window size because the underlying lookup is
/// parameterized by window; the groups run concurrently under
/// `max_concurrent` via the shared pool. A failed group is logged,
/// counted, and treated as zero documents; it never aborts sibling
/// groups. Each task keeps at most `max_docs_per_task` documents,
/// nearest the anchor date first.
pub async fn run_lookups<Q>(
    index: Arc<Q>,
    tasks: Vec<SearchTask>,
    max_concurrent: usize,
    max_docs_per_task: usize,
) -> BatchedCandidates
where
    Q: CorpusIndex + Send + Sync + 'static,
    Q::Error: std::fmt::Display,
{
    // BTreeMap keeps group submission order deterministic
    let mut groups: BTreeMap<u32, Vec<SearchTask>> = BTreeMap::new();
    for task in tasks {
        groups.entry(task.window_days).or_default().push(task);
    }

    debug!(groups = groups.len(), "Running lookup phase");

    let group_results = run_bounded(
        groups.into_iter().collect::<Vec<_>>(),
        max_concurrent,
        move |(window_days, group)| {
            let index = Arc::clone(&index);
            async move {
                let lookup_tasks = group.clone();
                let result = tokio::task::spawn_blocking(move || {
                    index
                        .lookup(&lookup_tasks, window_days)
                        .map_err(|e| e.to_string())
                })
                .await
                .unwrap_or_else(|e| Err(format!("Lookup task join error: {}", e)));
                (window_days, group, result)
            }
        },
    )
    .await;

    let mut per_task = Vec::new();
    let mut lookup_failures = 0;

    for (window_days, group, result) in group_results {
        let mut hits = match result {
            Ok(hits) => hits,
            Err(e) => {
                warn!(window_days, "Lookup failed for window group: {}", e);
                lookup_failures += 1;
                continue;
            }
        };

        for task in group {
            let Some(mut docs) = hits.remove(&task.key()) else {
                continue;
            };
            if docs.is_empty() {
                continue;
            }
            docs.sort_by_key(|doc| doc.day_distance(task.anchor_date));
            docs.truncate(max_docs_per_task);
            per_task.push((task, docs));
        }
    }

    BatchedCandidates {
        per_task,
        lookup_failures,
    }
}
