//! PostgreSQL full-text search engine.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::config::EngineConfig;
use crate::core::{RecordSource, SearchConnection, SearchEngine, Searchable};
use crate::error::EngineResult;
use crate::sql::{Statement, TsQueryBuilder};
use crate::types::{RawResults, SearchIndex, SearchKey, SearchQuery};

/// Search engine storing vectors in a `tsvector` column and ranking with
/// `ts_rank`.
///
/// The engine owns no state beyond its configuration; every call is a
/// sequence of statements on `C`.
#[derive(Debug, Clone)]
pub struct PostgresEngine<C> {
    connection: C,
    config: EngineConfig,
}

impl<C: SearchConnection> PostgresEngine<C> {
    /// Creates an engine with the default configuration.
    pub fn new(connection: C) -> Self {
        Self::with_config(connection, EngineConfig::default())
    }

    /// Creates an engine with an explicit configuration.
    pub fn with_config(connection: C, config: EngineConfig) -> Self {
        Self { connection, config }
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the underlying connection.
    pub fn connection(&self) -> &C {
        &self.connection
    }

    async fn execute(&self, statement: Statement) -> EngineResult<u64> {
        tracing::debug!("pgscout execute: {}", statement.sql);
        self.connection.execute(&statement).await
    }

    async fn index_record<R: Searchable>(
        &self,
        index: &SearchIndex,
        record: &R,
    ) -> EngineResult<()> {
        let key = record.search_key();
        let fields = record.to_searchable_fields();
        TsQueryBuilder::check_fields(index, &fields)?;
        let expression = TsQueryBuilder::vector_expression(index, &self.config, &fields);
        let select = TsQueryBuilder::select_vector(expression);
        tracing::debug!("pgscout vectorize {}/{}: {}", index.table, key, select.sql);

        // NULL only comes back from a NULL expression, which the builder
        // never produces.
        let vector = self
            .connection
            .query_text(&select)
            .await?
            .unwrap_or_default();

        let extra = record.additional_columns();
        let updated = self
            .execute(TsQueryBuilder::update_vector(index, &key, &vector, &extra))
            .await?;

        if updated == 0 && index.external {
            self.execute(TsQueryBuilder::insert_vector(index, &key, &vector, &extra))
                .await?;
        }

        Ok(())
    }
}

#[async_trait]
impl<C: SearchConnection> SearchEngine for PostgresEngine<C> {
    async fn update<R: Searchable>(&self, records: &[R]) -> EngineResult<()> {
        let index = R::search_index();
        if !self.config.maintains(&index) {
            tracing::trace!("pgscout update skipped for {}: maintenance disabled", index.table);
            return Ok(());
        }

        for record in records {
            self.index_record(&index, record).await?;
        }

        tracing::debug!("pgscout indexed {} records in {}", records.len(), index.table);
        Ok(())
    }

    async fn delete<R: Searchable>(&self, records: &[R]) -> EngineResult<()> {
        let index = R::search_index();
        if !self.config.maintains(&index) {
            tracing::trace!("pgscout delete skipped for {}: maintenance disabled", index.table);
            return Ok(());
        }
        if records.is_empty() {
            return Ok(());
        }

        let keys = records.iter().map(|record| record.search_key()).collect();
        self.execute(TsQueryBuilder::delete_vectors(&index, keys))
            .await?;
        Ok(())
    }

    async fn search(&self, query: &SearchQuery) -> EngineResult<RawResults> {
        let statement = TsQueryBuilder::search(query, &self.config);
        tracing::debug!("pgscout search {}: {}", query.index.table, statement.sql);

        let rows = self.connection.query_rows(&statement).await?;
        Ok(RawResults::new(rows))
    }

    async fn paginate(
        &self,
        query: &SearchQuery,
        per_page: u64,
        page: u64,
    ) -> EngineResult<RawResults> {
        let paged = query.clone().for_page(per_page, page);
        self.search(&paged).await
    }

    async fn map<S: RecordSource>(
        &self,
        results: &RawResults,
        source: &S,
    ) -> EngineResult<Vec<S::Record>> {
        if results.is_empty() {
            return Ok(Vec::new());
        }

        let keys = results.keys();
        let mut by_key: HashMap<SearchKey, S::Record> = source
            .find_many(&keys)
            .await?
            .into_iter()
            .map(|record| (record.search_key(), record))
            .collect();

        Ok(keys.iter().filter_map(|key| by_key.remove(key)).collect())
    }

    fn map_ids(&self, results: &RawResults) -> Vec<SearchKey> {
        results.keys()
    }

    fn get_total_count(&self, results: &RawResults) -> u64 {
        results.total_count()
    }

    async fn flush(&self, index: &SearchIndex) -> EngineResult<()> {
        let cleared = self.execute(TsQueryBuilder::flush(index)).await?;
        tracing::info!("pgscout flushed {} rows of {}", cleared, index.table);
        Ok(())
    }

    async fn create_index(&self, index: &SearchIndex) -> EngineResult<()> {
        for statement in TsQueryBuilder::create_index(index) {
            self.execute(statement).await?;
        }
        tracing::info!(
            "pgscout created search column {}.{} with index {}",
            index.table,
            index.column,
            index.gin_index_name()
        );
        Ok(())
    }

    async fn delete_index(&self, index: &SearchIndex) -> EngineResult<()> {
        self.execute(TsQueryBuilder::drop_index(index)).await?;
        tracing::info!("pgscout dropped index {}", index.gin_index_name());
        Ok(())
    }

    async fn rebuild(&self, index: &SearchIndex) -> EngineResult<u64> {
        let updated = self
            .execute(TsQueryBuilder::rebuild(index, &self.config)?)
            .await?;
        tracing::info!("pgscout rebuilt {} vectors in {}", updated, index.table);
        Ok(updated)
    }
}
