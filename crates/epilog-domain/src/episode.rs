//! Episode module - the unit of work whose completion date is missing

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::Date;

/// Opaque identifier for an episode, assigned upstream
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EpisodeId(String);

impl EpisodeId {
    /// Create an episode id from an upstream identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EpisodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Kind of episode, selecting the extraction recipe
///
/// The prompt wording and the completion vocabulary differ slightly per
/// kind, so the pipeline carries it on every task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EpisodeKind {
    /// A course of therapy with a dated start and an end to be found
    Therapy,
    /// A procedure whose follow-up closure date is to be found
    Procedure,
}

impl EpisodeKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            EpisodeKind::Therapy => "therapy",
            EpisodeKind::Procedure => "procedure",
        }
    }

    /// Parse a kind from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "therapy" => Some(EpisodeKind::Therapy),
            "procedure" => Some(EpisodeKind::Procedure),
            _ => None,
        }
    }
}

impl std::str::FromStr for EpisodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid episode kind: {}", s))
    }
}

/// Raw episode as received from upstream, before task generation
///
/// The anchor date arrives as a string; episodes whose anchor does not
/// parse are skipped during generation and reported, not fatal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeInput {
    /// Upstream identifier
    pub id: EpisodeId,

    /// Extraction recipe selector
    pub kind: EpisodeKind,

    /// Anchor (start) date in `YYYY-MM-DD` form
    pub anchor_date: String,

    /// Episode-specific terms (e.g. agent names) required by the
    /// keyword pre-filter when non-empty
    pub keywords: Vec<String>,
}

/// Parse a `YYYY-MM-DD` date string
pub fn parse_iso_date(s: &str) -> Option<Date> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(s.trim(), &format).ok()
}
