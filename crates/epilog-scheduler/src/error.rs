//! Error types for the scheduler

use thiserror::Error;

/// Errors that abort a run before any scheduling begins
///
/// Everything below the batch boundary degrades to counters and failed
/// outcomes instead; only malformed configuration or an unusable input
/// batch is fatal.
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// Malformed configuration or tier plan
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The input batch cannot produce any work
    #[error("Empty batch: {0}")]
    EmptyBatch(String),
}
