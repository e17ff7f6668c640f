//! The search engine contract.

use async_trait::async_trait;

use crate::error::EngineResult;
use crate::types::{RawResults, SearchIndex, SearchKey, SearchQuery};

use super::{RecordSource, Searchable};

/// Operations a host framework invokes on a search engine.
///
/// Write operations (`update`, `delete`) are no-ops when index maintenance
/// is disabled for the record type. Nothing is retried: database errors are
/// returned as they were raised.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Recomputes and stores the search vector of every record.
    async fn update<R: Searchable>(&self, records: &[R]) -> EngineResult<()>;

    /// Clears the search vector of every record. Rows are kept.
    async fn delete<R: Searchable>(&self, records: &[R]) -> EngineResult<()>;

    /// Runs a ranked search.
    async fn search(&self, query: &SearchQuery) -> EngineResult<RawResults>;

    /// Runs a ranked search for one page. Pages start at 1.
    async fn paginate(
        &self,
        query: &SearchQuery,
        per_page: u64,
        page: u64,
    ) -> EngineResult<RawResults>;

    /// Loads the records behind `results`, in rank order. Keys the source
    /// cannot resolve are dropped.
    async fn map<S: RecordSource>(
        &self,
        results: &RawResults,
        source: &S,
    ) -> EngineResult<Vec<S::Record>>;

    /// Keys of `results` in rank order.
    fn map_ids(&self, results: &RawResults) -> Vec<SearchKey>;

    /// Number of matches across all pages.
    fn get_total_count(&self, results: &RawResults) -> u64;

    /// Clears the search vector of every row in the index's table.
    async fn flush(&self, index: &SearchIndex) -> EngineResult<()>;

    /// Creates the search column and its GIN index if missing.
    async fn create_index(&self, index: &SearchIndex) -> EngineResult<()>;

    /// Drops the GIN index if present.
    async fn delete_index(&self, index: &SearchIndex) -> EngineResult<()>;

    /// Recomputes every vector of the table from its field columns and
    /// returns the number of rows updated.
    async fn rebuild(&self, index: &SearchIndex) -> EngineResult<u64>;
}
