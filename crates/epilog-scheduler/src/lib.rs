//! Epilog Scheduler
//!
//! The coordination core: a priority-tiered, bounded-concurrency
//! evidence search over a document corpus.
//!
//! # Overview
//!
//! Given a batch of episodes each missing a completion date, the
//! scheduler walks the tier plan in priority order. Per tier it batches
//! corpus lookups by window size, fetches and caches document text,
//! keyword-filters candidates, runs oracle extractions under a
//! concurrency bound, and validates the results. An episode stops being
//! searched as soon as one validated date is found; the whole batch
//! stops as soon as every episode is resolved.
//!
//! # Architecture
//!
//! ```text
//! TierScheduler → QueryBatcher → DocumentCache → KeywordFilter → DateExtractor → BatchReport
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use epilog_scheduler::{Scheduler, SchedulerConfig};
//! use epilog_domain::{EpisodeInput, EpisodeId, EpisodeKind, TierPlan};
//! # use std::collections::HashMap;
//! # use epilog_domain::traits::{CorpusIndex, DocumentStore};
//! # struct Index; struct Docs;
//! # impl CorpusIndex for Index {
//! #     type Error = String;
//! #     fn lookup(&self, _: &[epilog_domain::SearchTask], _: u32)
//! #         -> Result<HashMap<epilog_domain::TaskKey, Vec<epilog_domain::DocumentRef>>, String>
//! #     { Ok(HashMap::new()) }
//! # }
//! # impl DocumentStore for Docs {
//! #     type Error = String;
//! #     fn fetch_text(&self, _: &str) -> Result<String, String> { Ok(String::new()) }
//! # }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let oracle = epilog_llm::OllamaOracle::default_endpoint("llama2");
//! let scheduler = Scheduler::new(Index, Docs, oracle, TierPlan::default(), SchedulerConfig::default());
//!
//! let episodes = vec![EpisodeInput {
//!     id: EpisodeId::new("ep-001"),
//!     kind: EpisodeKind::Therapy,
//!     anchor_date: "2024-01-10".to_string(),
//!     keywords: vec!["carboplatin".to_string()],
//! }];
//!
//! let report = scheduler.run(episodes).await?;
//! println!("Resolved {}/{} episodes", report.resolved_count, report.total_episodes);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod batcher;
mod cache;
mod config;
mod error;
mod generate;
mod pool;
mod scheduler;
mod summary;

pub use cache::DocumentCache;
pub use config::SchedulerConfig;
pub use error::SchedulerError;
pub use generate::{generate_tasks, GenerationReport, SkippedEpisode};
pub use pool::run_bounded;
pub use scheduler::Scheduler;
pub use summary::{
    BatchReport, EpisodeResolution, FailureCounts, ResolutionStatus, ResolvedDate, TierSummary,
};
