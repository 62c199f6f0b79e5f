//! Memoizing cache of extracted document text

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Shared cache mapping document id to extracted plain text
///
/// Consulted before any fetch; written after a successful fetch. Writes
/// are keyed by document id and idempotent, so a plain mutex around the
/// map is sufficient; workers never hold it across a suspension point.
/// One cache instance belongs to one scheduler run; it is not shared
/// across runs.
#[derive(Debug, Clone, Default)]
pub struct DocumentCache {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl DocumentCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the text for a document id
    pub fn get(&self, document_id: &str) -> Option<String> {
        self.inner.lock().unwrap().get(document_id).cloned()
    }

    /// Whether a document id is already cached
    pub fn contains(&self, document_id: &str) -> bool {
        self.inner.lock().unwrap().contains_key(document_id)
    }

    /// Store the text for a document id
    pub fn put(&self, document_id: impl Into<String>, text: impl Into<String>) {
        self.inner
            .lock()
            .unwrap()
            .insert(document_id.into(), text.into());
    }

    /// Number of cached documents
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }
}
