//! High-score table

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entries kept in the table
pub const MAX_HIGH_SCORES: usize = 10;

/// One table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
    /// Serialized as RFC 3339
    pub date: DateTime<Utc>,
}

/// Top scores, descending. Equal scores keep submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScoreTable {
    entries: Vec<HighScoreEntry>,
}

impl HighScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a persisted table, normalizing order and length
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut entries: Vec<HighScoreEntry> = serde_json::from_str(json)?;
        // Stable sort keeps the earlier of two equal scores first
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_HIGH_SCORES);
        Ok(Self { entries })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.entries)
    }

    /// Would `score` make the table
    pub fn qualifies(&self, score: u64) -> bool {
        self.insert_position(score) < MAX_HIGH_SCORES
    }

    /// Insert a score; returns its 0-based rank, or `None` if it did not place
    pub fn submit(&mut self, name: impl Into<String>, score: u64, date: DateTime<Utc>) -> Option<usize> {
        let rank = self.insert_position(score);
        if rank >= MAX_HIGH_SCORES {
            return None;
        }
        self.entries.insert(
            rank,
            HighScoreEntry {
                name: name.into(),
                score,
                date,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    pub fn best(&self) -> Option<&HighScoreEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert_position(&self, score: u64) -> usize {
        self.entries
            .iter()
            .position(|e| e.score < score)
            .unwrap_or(self.entries.len())
    }
}
