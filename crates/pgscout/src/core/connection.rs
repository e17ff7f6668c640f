//! SQL execution capability.

use async_trait::async_trait;

use crate::error::EngineResult;
use crate::sql::Statement;
use crate::types::SearchRow;

/// Runs statements produced by the query builder.
///
/// The engine never builds a statement it cannot describe as a [`Statement`],
/// so implementations only need to bind the parameters in order. Errors from
/// the database must be returned unchanged.
#[async_trait]
pub trait SearchConnection: Send + Sync {
    /// Executes a statement and returns the number of affected rows.
    async fn execute(&self, statement: &Statement) -> EngineResult<u64>;

    /// Runs a query returning one text column and returns the first row's
    /// value, or `None` when the query returns no rows or a NULL.
    async fn query_text(&self, statement: &Statement) -> EngineResult<Option<String>>;

    /// Runs a search query returning `key, rank, total_count` rows.
    async fn query_rows(&self, statement: &Statement) -> EngineResult<Vec<SearchRow>>;
}
