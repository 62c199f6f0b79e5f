//! Keyword pre-filter gating documents before oracle calls

use epilog_domain::SearchTask;

/// Decides whether a document's text is worth an oracle call
///
/// Behind a trait so matching can be swapped or unit-tested
/// independently of fetch and extraction.
pub trait KeywordFilter: Send + Sync {
    /// Whether this document should be sent to the oracle for this task
    fn admits(&self, text: &str, task: &SearchTask) -> bool;
}

/// Default filter: completion vocabulary plus episode-specific terms
///
/// A document is admitted when its text contains at least one
/// completion-style term AND, if the task carries episode-specific
/// keywords, at least one of those. Matching is case-insensitive
/// substring containment.
#[derive(Debug, Clone)]
pub struct CompletionKeywordFilter {
    vocabulary: Vec<String>,
}

/// Completion-style terms that suggest a document discusses the end of
/// an episode
const COMPLETION_VOCABULARY: &[&str] = &[
    "complete",
    "completed",
    "completion",
    "finished",
    "final",
    "concluded",
    "last dose",
    "last cycle",
    "end of treatment",
    "discharged",
];

impl CompletionKeywordFilter {
    /// Create a filter with a custom vocabulary
    pub fn new(vocabulary: Vec<String>) -> Self {
        Self {
            vocabulary: vocabulary.into_iter().map(|t| t.to_lowercase()).collect(),
        }
    }
}

impl Default for CompletionKeywordFilter {
    fn default() -> Self {
        Self::new(COMPLETION_VOCABULARY.iter().map(|t| t.to_string()).collect())
    }
}

impl KeywordFilter for CompletionKeywordFilter {
    fn admits(&self, text: &str, task: &SearchTask) -> bool {
        let haystack = text.to_lowercase();

        if !self.vocabulary.iter().any(|term| haystack.contains(term)) {
            return false;
        }

        if task.keywords.is_empty() {
            return true;
        }

        task.keywords
            .iter()
            .any(|kw| haystack.contains(&kw.to_lowercase()))
    }
}
