//! Command line arguments.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PGSCOUT_DATABASE_URL` | (from `PGSCOUT_PG_*`) | `postgres://` connection URL |
//! | `PGSCOUT_INDEX` | | Path to the index descriptor JSON |
//! | `PGSCOUT_LOG_LEVEL` | info | Log level |

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pgscout::{SearchIndex, SearchQuery, SqlParam};

/// Manage and query PostgreSQL full-text search columns.
#[derive(Debug, Clone, Parser)]
#[command(name = "pgscout")]
#[command(about = "PostgreSQL tsvector search index tool", version)]
pub struct Cli {
    /// PostgreSQL connection URL. Falls back to `PGSCOUT_PG_*` variables.
    #[arg(long, env = "PGSCOUT_DATABASE_URL")]
    pub database_url: Option<String>,

    /// JSON file describing the search index.
    #[arg(long, env = "PGSCOUT_INDEX")]
    pub index: PathBuf,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "PGSCOUT_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Add the tsvector column and its GIN index.
    CreateIndex,

    /// Drop the GIN index. The column and its data are kept.
    DropIndex,

    /// Recompute every vector from the indexed columns.
    Rebuild,

    /// Clear every vector.
    Flush,

    /// Run a ranked search and print the rows as JSON.
    Search(SearchArgs),
}

/// Arguments of the `search` subcommand.
#[derive(Debug, Clone, clap::Args)]
pub struct SearchArgs {
    /// Free-text query.
    pub text: String,

    /// Equality filter as `column=value`. Repeatable. `column=null` filters
    /// on `IS NULL`.
    #[arg(long = "where", value_name = "COLUMN=VALUE", value_parser = parse_where)]
    pub filters: Vec<(String, WhereValue)>,

    /// Rows per page.
    #[arg(long, default_value = "15")]
    pub limit: u64,

    /// Page number, starting at 1.
    #[arg(long, default_value = "1")]
    pub page: u64,

    /// Include soft-deleted rows.
    #[arg(long)]
    pub with_trashed: bool,
}

/// Parsed value of a `--where` filter.
#[derive(Debug, Clone, PartialEq)]
pub enum WhereValue {
    /// `IS NULL`
    Null,
    /// `= value`
    Value(SqlParam),
}

fn parse_where(raw: &str) -> Result<(String, WhereValue), String> {
    let (column, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=VALUE, got '{}'", raw))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("missing column name in '{}'", raw));
    }

    let value = match value {
        "null" | "NULL" => WhereValue::Null,
        "true" => WhereValue::Value(SqlParam::Bool(true)),
        "false" => WhereValue::Value(SqlParam::Bool(false)),
        v => match v.parse::<i64>() {
            Ok(n) => WhereValue::Value(SqlParam::Integer(n)),
            Err(_) => match v.parse::<f64>() {
                Ok(f) => WhereValue::Value(SqlParam::Float(f)),
                Err(_) => WhereValue::Value(SqlParam::Text(v.to_string())),
            },
        },
    };

    Ok((column.to_string(), value))
}

impl SearchArgs {
    /// Builds the query against `index`.
    pub fn to_query(&self, index: SearchIndex) -> SearchQuery {
        let mut query = SearchQuery::new(index, self.text.as_str());
        for (column, value) in &self.filters {
            query = match value {
                WhereValue::Null => query.where_null(column.as_str()),
                WhereValue::Value(v) => query.where_eq(column.as_str(), v.clone()),
            };
        }
        if self.with_trashed {
            query = query.with_trashed();
        }
        query
    }
}
