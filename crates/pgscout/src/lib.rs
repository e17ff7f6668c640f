//! PostgreSQL full-text search engine adapter.
//!
//! This crate indexes application records into a `tsvector` column and
//! answers ranked queries with PostgreSQL's own full-text search
//! (`to_tsvector`, `plainto_tsquery`, `ts_rank`). PostgreSQL does all of the
//! tokenizing, ranking and indexing; the adapter only writes vectors, clears
//! them, runs the ranked query and maps rows back to records.
//!
//! # Features
//!
//! - `postgres` (default) - deadpool/tokio-postgres [`SearchConnection`]
//! - `integration` - tests against a real PostgreSQL container (Docker)
//!
//! # Architecture
//!
//! - [`types`] - keys, index descriptors, queries and raw results
//! - [`sql`] - statement text and bound parameters
//! - [`core`] - [`SearchEngine`], [`Searchable`], [`RecordSource`] and
//!   [`SearchConnection`]
//! - [`engine`] - [`PostgresEngine`], the [`SearchEngine`] implementation
//! - [`backends`] - connection implementations
//! - [`config`] - engine wide defaults
//! - [`error`] - error types
//!
//! # Quick Start
//!
//! ```ignore
//! use pgscout::backends::postgres::PgSearchConnection;
//! use pgscout::{PostgresEngine, SearchEngine, SearchQuery};
//!
//! let connection = PgSearchConnection::from_env().await?;
//! let engine = PostgresEngine::new(connection);
//!
//! engine.update(&posts).await?;
//!
//! let results = engine
//!     .search(&SearchQuery::for_type::<Post>("rust").where_eq("published", true).take(5))
//!     .await?;
//! let total = engine.get_total_count(&results);
//! let posts = engine.map(&results, &post_repository).await?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod sql;
pub mod types;

pub use config::EngineConfig;
pub use crate::core::{RecordSource, SearchConnection, SearchEngine, Searchable};
pub use engine::PostgresEngine;
pub use error::{BackendError, ConfigError, EngineError, EngineResult, LookupError};
pub use sql::{FieldValue, SqlParam};
pub use types::{
    Filter, IndexField, OrderClause, QueryParser, RankFunction, RankOptions, RawResults,
    SearchIndex, SearchKey, SearchQuery, SearchRow, SortDirection, UnweightedFields, Weight,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
