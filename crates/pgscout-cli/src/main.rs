//! pgscout command line tool.
//!
//! Creates, rebuilds and queries the `tsvector` column described by an index
//! JSON file.

mod cli;

use std::fs;

use anyhow::Context;
use clap::Parser;
use pgscout::backends::postgres::{PgSearchConnection, PostgresConfig};
use pgscout::{EngineConfig, PostgresEngine, SearchEngine, SearchIndex};
use serde_json::json;
use tracing::info;

use crate::cli::{Cli, Command};

/// Initializes the tracing subscriber. `RUST_LOG` overrides `level`.
fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pgscout={}", level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_index(cli: &Cli) -> anyhow::Result<SearchIndex> {
    let raw = fs::read_to_string(&cli.index)
        .with_context(|| format!("reading index file {}", cli.index.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("parsing index file {}", cli.index.display()))
}

async fn connect(cli: &Cli) -> anyhow::Result<PgSearchConnection> {
    let config = match &cli.database_url {
        Some(url) => PostgresConfig::parse_connection_string(url)?,
        None => PostgresConfig::from_env()?,
    };
    info!(host = %config.host, port = config.port, dbname = %config.dbname, "Connecting");
    Ok(PgSearchConnection::connect(config).await?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let index = load_index(&cli)?;
    let engine = PostgresEngine::with_config(connect(&cli).await?, EngineConfig::from_env()?);

    match &cli.command {
        Command::CreateIndex => engine.create_index(&index).await?,
        Command::DropIndex => engine.delete_index(&index).await?,
        Command::Flush => engine.flush(&index).await?,
        Command::Rebuild => {
            let updated = engine.rebuild(&index).await?;
            println!("{}", json!({ "table": index.table, "updated": updated }));
        }
        Command::Search(args) => {
            let query = args.to_query(index);
            let results = engine.paginate(&query, args.limit, args.page).await?;
            let output = json!({
                "total": engine.get_total_count(&results),
                "page": args.page,
                "ids": engine.map_ids(&results),
                "rows": results,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
