//! Core traits of the search adapter.
//!
//! - [`SearchEngine`] - the operations a host framework calls
//! - [`Searchable`] - implemented by indexed record types
//! - [`RecordSource`] - batch lookup used to map results back to records
//! - [`SearchConnection`] - executes the generated SQL
//!
//! ```text
//! host ──► SearchEngine ──► TsQueryBuilder ──► SearchConnection ──► PostgreSQL
//!              │
//!              └── map() ──► RecordSource::find_many
//! ```

mod connection;
mod engine;
mod searchable;

pub use connection::SearchConnection;
pub use engine::SearchEngine;
pub use searchable::{RecordSource, Searchable};
