//! Engine configuration.
//!
//! The engine configuration holds the defaults every [`SearchIndex`] falls
//! back to, plus the global index maintenance switch.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PGSCOUT_MAINTAIN_INDEX` | true | Write search vectors on update/delete |
//! | `PGSCOUT_CONFIG` | (database default) | Text search configuration |
//! | `PGSCOUT_SEARCH_USING` | plain | plain, phrase, tsquery or websearch |
//! | `PGSCOUT_RANK_FUNCTION` | ts_rank | ts_rank or ts_rank_cd |
//! | `PGSCOUT_RANK_NORMALIZATION` | (none) | Normalization bitmask |
//!
//! [`SearchIndex`]: crate::types::SearchIndex

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{QueryParser, RankOptions, SearchIndex};

/// Configuration shared by all indexes of an engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// When false, `update` and `delete` do nothing.
    #[serde(default = "default_maintain_index")]
    pub maintain_index: bool,

    /// Text search configuration (for example `english`). `None` uses the
    /// database's `default_text_search_config`.
    #[serde(default)]
    pub config: Option<String>,

    /// How free-text queries are parsed.
    #[serde(default)]
    pub search_using: QueryParser,

    /// Ranking options.
    #[serde(default)]
    pub rank: RankOptions,
}

fn default_maintain_index() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            maintain_index: default_maintain_index(),
            config: None,
            search_using: QueryParser::default(),
            rank: RankOptions::default(),
        }
    }
}

impl EngineConfig {
    /// Reads the configuration from `PGSCOUT_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = EngineConfig::default();

        if let Some(v) = lookup("PGSCOUT_MAINTAIN_INDEX") {
            config.maintain_index = parse_bool("PGSCOUT_MAINTAIN_INDEX", &v)?;
        }
        if let Some(v) = lookup("PGSCOUT_CONFIG").filter(|v| !v.is_empty()) {
            config.config = Some(v);
        }
        if let Some(v) = lookup("PGSCOUT_SEARCH_USING") {
            config.search_using = v.parse()?;
        }
        if let Some(v) = lookup("PGSCOUT_RANK_FUNCTION") {
            config.rank.function = v.parse()?;
        }
        if let Some(v) = lookup("PGSCOUT_RANK_NORMALIZATION") {
            config.rank.normalization =
                Some(v.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    name: "PGSCOUT_RANK_NORMALIZATION".to_string(),
                    value: v.clone(),
                })?);
        }

        Ok(config)
    }

    /// Whether writes should happen for `index`. Both the engine switch and
    /// the index override must allow it.
    pub fn maintains(&self, index: &SearchIndex) -> bool {
        self.maintain_index && index.maintain_index.unwrap_or(true)
    }

    /// Text search configuration for `index`.
    pub fn ts_config<'a>(&'a self, index: &'a SearchIndex) -> Option<&'a str> {
        index.config.as_deref().or(self.config.as_deref())
    }

    /// Query parser for `index`.
    pub fn parser(&self, index: &SearchIndex) -> QueryParser {
        index.search_using.unwrap_or(self.search_using)
    }

    /// Rank options for `index`.
    pub fn rank<'a>(&'a self, index: &'a SearchIndex) -> &'a RankOptions {
        index.rank.as_ref().unwrap_or(&self.rank)
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}
