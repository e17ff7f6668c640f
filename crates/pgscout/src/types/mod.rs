//! Core types for indexing and searching.
//!
//! - [`SearchKey`] - primary key values
//! - [`SearchIndex`] - where a record type's vector lives and how it is ranked
//! - [`SearchQuery`] - what to search for, filters and paging
//! - [`RawResults`] - rank ordered rows returned by a search

mod index;
mod key;
mod query;
mod results;

pub use index::{
    IndexField, QueryParser, RankFunction, RankOptions, SearchIndex, UnweightedFields, Weight,
};
pub use key::SearchKey;
pub use query::{Filter, OrderClause, SearchQuery, SortDirection};
pub use results::{RawResults, SearchRow};
