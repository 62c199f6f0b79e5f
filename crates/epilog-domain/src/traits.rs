//! Trait definitions for external collaborators
//!
//! These traits define the boundaries between the coordination core and
//! infrastructure. Implementations live in other crates (or in test
//! mocks); the core only consumes the contracts.

use crate::document::DocumentRef;
use crate::task::{SearchTask, TaskKey};
use std::collections::HashMap;

/// Trait for batched corpus lookups
///
/// One call covers every task of a single window group; results come
/// back keyed by [`TaskKey`] for demultiplexing. A task with no matching
/// documents is a miss, not an error; errors are surfaced per batch.
pub trait CorpusIndex {
    /// Error type for lookup operations
    type Error;

    /// Look up candidate documents for a batch of tasks sharing one
    /// window size
    fn lookup(
        &self,
        tasks: &[SearchTask],
        window_days: u32,
    ) -> Result<HashMap<TaskKey, Vec<DocumentRef>>, Self::Error>;
}

/// Trait for fetching a document's plain text
///
/// The collaborator is expected to attempt a primary extraction format
/// and fall back to a secondary one internally; the core only sees text
/// or an error.
pub trait DocumentStore {
    /// Error type for fetch operations
    type Error;

    /// Fetch the extracted plain text of one document
    fn fetch_text(&self, document_id: &str) -> Result<String, Self::Error>;
}

/// Trait for the date-extraction oracle
///
/// The oracle is a black box (an LLM in production). The core owns
/// prompt construction and response parsing; the oracle owns its own
/// timeout and transport concerns.
pub trait DateOracle {
    /// Error type for oracle operations
    type Error;

    /// Ask the oracle to extract a completion date from a prompt
    fn extract(&self, prompt: &str) -> Result<String, Self::Error>;
}
