//! SQL generation for the PostgreSQL search engine.

mod builder;
mod fragment;

pub use builder::{FieldValue, TsQueryBuilder};
pub use fragment::{SqlFragment, SqlParam, Statement, quote_ident, quote_literal};
