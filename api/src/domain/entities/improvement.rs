//! Improvement domain entity
//!
//! A rewritten headline and summary paired with the Original it came from.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::original::Original;

/// Unique identifier for an Improvement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImprovementId(pub Uuid);

impl ImprovementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ImprovementId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ImprovementId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::str::FromStr for ImprovementId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl std::fmt::Display for ImprovementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Improvement {
    pub id: ImprovementId,
    pub original: Original,
    pub title: String,
    pub summary: String,
}

impl Improvement {
    /// Pair an Original with its rewrite under a fresh id
    pub fn new(original: Original, title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            id: ImprovementId::new(),
            original,
            title: title.into(),
            summary: summary.into(),
        }
    }
}

/// Sort improvements newest first by the original publish date
pub fn sort_newest_first(improvements: &mut [Improvement]) {
    improvements.sort_by(|a, b| b.original.date.cmp(&a.original.date));
}
