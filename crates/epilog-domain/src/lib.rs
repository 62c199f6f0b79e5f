//! Epilog Domain Layer
//!
//! This crate contains the core domain model for Epilog: the value objects
//! that flow through the tiered evidence search, and the trait interfaces
//! the coordination core depends on.
//!
//! ## Key Concepts
//!
//! - **Episode**: a time-bounded unit of work with a known anchor (start)
//!   date and a missing completion date
//! - **Search Task**: one unit of search intent (one episode, one priority
//!   tier, one day-radius window)
//! - **Tier**: an ordered priority bucket of document kinds, highest
//!   priority searched first
//! - **Extraction Outcome**: the validated result of asking the date oracle
//!   about one document for one task
//!
//! ## Architecture
//!
//! Pure domain types and trait seams only. Infrastructure implementations
//! (corpus index, document store, oracle backends) live in other crates.
//! The only external dependencies are `time` (the calendar-date primitive)
//! and `serde`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod confidence;
pub mod document;
pub mod episode;
pub mod outcome;
pub mod task;
pub mod tier;
pub mod traits;

// Re-exports for convenience
pub use confidence::ConfidenceLabel;
pub use document::{DocumentKind, DocumentRef};
pub use episode::{EpisodeId, EpisodeInput, EpisodeKind};
pub use outcome::{ExtractionOutcome, FailureKind, Verdict};
pub use task::{SearchTask, TaskKey};
pub use tier::{TierPlan, TierSpec};
