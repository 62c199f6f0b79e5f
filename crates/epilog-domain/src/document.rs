//! Document references returned by corpus lookups

use serde::{Deserialize, Serialize};
use time::Date;

/// Category of a corpus document
///
/// Tiers are defined as ordered sets of document kinds; higher-signal
/// kinds (summaries) are searched before lower-signal ones
/// (correspondence).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    /// End-of-episode summary documents
    Summary,
    /// Structured reports
    Report,
    /// Free-text progress notes
    Note,
    /// Letters and other correspondence
    Correspondence,
}

impl DocumentKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Summary => "summary",
            DocumentKind::Report => "report",
            DocumentKind::Note => "note",
            DocumentKind::Correspondence => "correspondence",
        }
    }

    /// Parse a kind from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "summary" => Some(DocumentKind::Summary),
            "report" => Some(DocumentKind::Report),
            "note" => Some(DocumentKind::Note),
            "correspondence" => Some(DocumentKind::Correspondence),
            _ => None,
        }
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid document kind: {}", s))
    }
}

/// One document returned by a corpus lookup
///
/// The reference is immutable; the document's extracted text lives in the
/// scheduler's cache, populated at most once per id per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Corpus-wide document identifier
    pub document_id: String,

    /// Date the document was authored
    pub document_date: Date,

    /// Category of the document
    pub kind: DocumentKind,
}

impl DocumentRef {
    /// Absolute distance in days between this document and an anchor date
    pub fn day_distance(&self, anchor: Date) -> i64 {
        (self.document_date - anchor).whole_days().abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_kind_round_trip() {
        for kind in [
            DocumentKind::Summary,
            DocumentKind::Report,
            DocumentKind::Note,
            DocumentKind::Correspondence,
        ] {
            assert_eq!(DocumentKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(DocumentKind::parse("fax"), None);
    }

    #[test]
    fn test_day_distance() {
        let doc = DocumentRef {
            document_id: "doc-1".to_string(),
            document_date: date!(2024 - 02 - 10),
            kind: DocumentKind::Summary,
        };
        assert_eq!(doc.day_distance(date!(2024 - 02 - 01)), 9);
        assert_eq!(doc.day_distance(date!(2024 - 02 - 20)), 10);
        assert_eq!(doc.day_distance(date!(2024 - 02 - 10)), 0);
    }
}
