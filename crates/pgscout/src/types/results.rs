//! Raw search results.

use serde::{Deserialize, Serialize};

use super::SearchKey;

/// One row returned by a search: key, rank and the unpaged result size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRow {
    /// Primary key of the matching record.
    pub id: SearchKey,
    /// Rank score.
    #[serde(default)]
    pub rank: f32,
    /// Number of matching rows before limit/offset, repeated on every row.
    #[serde(default)]
    pub total_count: i64,
}

/// Rank ordered rows of one search, not yet mapped to records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawResults {
    /// The rows, best match first.
    pub rows: Vec<SearchRow>,
}

impl RawResults {
    /// Wraps rows.
    pub fn new(rows: Vec<SearchRow>) -> Self {
        Self { rows }
    }

    /// Returns true if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows on this page.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Keys in rank order.
    pub fn keys(&self) -> Vec<SearchKey> {
        self.rows.iter().map(|r| r.id.clone()).collect()
    }

    /// Total matches across all pages, read from the first row.
    pub fn total_count(&self) -> u64 {
        self.rows
            .first()
            .map(|r| u64::try_from(r.total_count).unwrap_or(0))
            .unwrap_or(0)
    }
}

impl From<Vec<SearchRow>> for RawResults {
    fn from(rows: Vec<SearchRow>) -> Self {
        Self::new(rows)
    }
}
