//! Per record type search index descriptors.
//!
//! A [`SearchIndex`] describes where the `tsvector` for a record type lives
//! and how it is built and ranked. It is fixed for a record type and handed
//! out by [`Searchable::search_index`](crate::core::Searchable::search_index).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// PostgreSQL `setweight` label. `A` ranks highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Weight {
    /// Highest priority.
    A,
    /// Second priority.
    B,
    /// Third priority.
    C,
    /// Lowest priority, and PostgreSQL's default label.
    D,
}

impl Weight {
    /// Returns the label as used inside SQL (`'A'` .. `'D'`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Weight::A => "A",
            Weight::B => "B",
            Weight::C => "C",
            Weight::D => "D",
        }
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weight {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Weight::A),
            "B" => Ok(Weight::B),
            "C" => Ok(Weight::C),
            "D" => Ok(Weight::D),
            _ => Err(ConfigError::InvalidWeight {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Weight {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Weight> for String {
    fn from(w: Weight) -> Self {
        w.as_str().to_string()
    }
}

/// A searchable field and its optional weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexField {
    /// Field (and, for server side rebuilds, column) name.
    pub name: String,
    /// Weight applied with `setweight`, if any.
    #[serde(default)]
    pub weight: Option<Weight>,
}

impl IndexField {
    /// Creates an unweighted field.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weight: None,
        }
    }

    /// Creates a weighted field.
    pub fn weighted(name: impl Into<String>, weight: Weight) -> Self {
        Self {
            name: name.into(),
            weight: Some(weight),
        }
    }
}

/// What happens to record fields after the first one that carry no weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnweightedFields {
    /// Leave them out of the vector.
    #[default]
    Drop,
    /// Vectorize them without a weight.
    Include,
}

/// Ranking function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankFunction {
    /// `ts_rank` (term frequency).
    #[default]
    TsRank,
    /// `ts_rank_cd` (cover density).
    TsRankCd,
}

impl RankFunction {
    /// SQL function name.
    pub fn as_sql(&self) -> &'static str {
        match self {
            RankFunction::TsRank => "ts_rank",
            RankFunction::TsRankCd => "ts_rank_cd",
        }
    }
}

impl FromStr for RankFunction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ts_rank" => Ok(RankFunction::TsRank),
            "ts_rank_cd" => Ok(RankFunction::TsRankCd),
            _ => Err(ConfigError::InvalidValue {
                name: "rank function".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Options passed to the ranking function.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RankOptions {
    /// Ranking function.
    #[serde(default)]
    pub function: RankFunction,

    /// Weights for labels `{D, C, B, A}`, in PostgreSQL's order.
    #[serde(default)]
    pub weights: Option<[f32; 4]>,

    /// Normalization bitmask (see the PostgreSQL `ts_rank` documentation).
    #[serde(default)]
    pub normalization: Option<u32>,
}

/// Function used to turn the free-text query into a `tsquery`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryParser {
    /// `plainto_tsquery`
    #[default]
    Plain,
    /// `phraseto_tsquery`
    Phrase,
    /// `to_tsquery` (raw tsquery syntax)
    TsQuery,
    /// `websearch_to_tsquery`
    WebSearch,
}

impl QueryParser {
    /// SQL function name.
    pub fn as_sql(&self) -> &'static str {
        match self {
            QueryParser::Plain => "plainto_tsquery",
            QueryParser::Phrase => "phraseto_tsquery",
            QueryParser::TsQuery => "to_tsquery",
            QueryParser::WebSearch => "websearch_to_tsquery",
        }
    }
}

impl FromStr for QueryParser {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" | "plainquery" => Ok(QueryParser::Plain),
            "phrase" | "phrasequery" => Ok(QueryParser::Phrase),
            "tsquery" => Ok(QueryParser::TsQuery),
            "websearch" | "websearchquery" => Ok(QueryParser::WebSearch),
            _ => Err(ConfigError::InvalidValue {
                name: "query parser".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Describes the search column of one record type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchIndex {
    /// Table holding the search column.
    pub table: String,

    /// Primary key column.
    #[serde(default = "default_key_column")]
    pub key_column: String,

    /// `tsvector` column.
    #[serde(default = "default_search_column")]
    pub column: String,

    /// Searchable fields in vector order, with their weights.
    #[serde(default)]
    pub fields: Vec<IndexField>,

    /// Name of the field that is always vectorized first. When set, it is
    /// also the first entry of `fields` and the index describes the whole
    /// vector, which `rebuild` requires.
    #[serde(default)]
    pub primary_field: Option<String>,

    /// Policy for unweighted fields after the primary one.
    #[serde(default)]
    pub unweighted_fields: UnweightedFields,

    /// Text search configuration overriding the engine's.
    #[serde(default)]
    pub config: Option<String>,

    /// Rank options overriding the engine's.
    #[serde(default)]
    pub rank: Option<RankOptions>,

    /// Query parser overriding the engine's.
    #[serde(default)]
    pub search_using: Option<QueryParser>,

    /// Per index maintenance switch. `Some(false)` disables writes even when
    /// the engine maintains indexes.
    #[serde(default)]
    pub maintain_index: Option<bool>,

    /// The search column lives in a separate table whose rows may be missing.
    #[serde(default)]
    pub external: bool,

    /// Rows of this type are soft-deleted; searches exclude them by default.
    #[serde(default)]
    pub soft_deletes: bool,

    /// Column marking soft-deleted rows.
    #[serde(default = "default_soft_delete_column")]
    pub soft_delete_column: String,
}

fn default_key_column() -> String {
    "id".to_string()
}

fn default_search_column() -> String {
    "searchable".to_string()
}

fn default_soft_delete_column() -> String {
    "deleted_at".to_string()
}

impl SearchIndex {
    /// Creates an index on `table` with default column names.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            key_column: default_key_column(),
            column: default_search_column(),
            fields: Vec::new(),
            primary_field: None,
            unweighted_fields: UnweightedFields::default(),
            config: None,
            rank: None,
            search_using: None,
            maintain_index: None,
            external: false,
            soft_deletes: false,
            soft_delete_column: default_soft_delete_column(),
        }
    }

    /// Sets the primary key column.
    pub fn with_key_column(mut self, column: impl Into<String>) -> Self {
        self.key_column = column.into();
        self
    }

    /// Sets the `tsvector` column.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    /// Declares the primary field and moves it to the front of `fields`.
    pub fn with_primary_field(mut self, name: impl Into<String>, weight: Option<Weight>) -> Self {
        let name = name.into();
        self.fields.retain(|f| f.name != name);
        self.fields.insert(
            0,
            IndexField {
                name: name.clone(),
                weight,
            },
        );
        self.primary_field = Some(name);
        self
    }

    /// Appends an unweighted field.
    pub fn with_field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(IndexField::new(name));
        self
    }

    /// Appends a weighted field, or sets the weight of a listed one.
    pub fn with_weighted_field(mut self, name: impl Into<String>, weight: Weight) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.weight = Some(weight),
            None => self.fields.push(IndexField::weighted(name, weight)),
        }
        self
    }

    /// Returns the declared primary field when it leads `fields`.
    pub fn listed_primary_field(&self) -> Option<&IndexField> {
        let primary = self.primary_field.as_deref()?;
        self.fields.first().filter(|f| f.name == primary)
    }

    /// Sets the unweighted field policy.
    pub fn with_unweighted_fields(mut self, policy: UnweightedFields) -> Self {
        self.unweighted_fields = policy;
        self
    }

    /// Sets the text search configuration.
    pub fn with_config(mut self, config: impl Into<String>) -> Self {
        self.config = Some(config.into());
        self
    }

    /// Sets the rank options.
    pub fn with_rank(mut self, rank: RankOptions) -> Self {
        self.rank = Some(rank);
        self
    }

    /// Sets the query parser.
    pub fn with_search_using(mut self, parser: QueryParser) -> Self {
        self.search_using = Some(parser);
        self
    }

    /// Sets the per index maintenance switch.
    pub fn with_maintain_index(mut self, maintain: bool) -> Self {
        self.maintain_index = Some(maintain);
        self
    }

    /// Marks the index as external.
    pub fn external(mut self) -> Self {
        self.external = true;
        self
    }

    /// Marks the record type as soft-deletable.
    pub fn soft_deletes(mut self) -> Self {
        self.soft_deletes = true;
        self
    }

    /// Marks the record type as soft-deletable through `column`.
    pub fn with_soft_delete_column(mut self, column: impl Into<String>) -> Self {
        self.soft_deletes = true;
        self.soft_delete_column = column.into();
        self
    }

    /// Returns the configured weight of a field.
    pub fn weight_of(&self, field: &str) -> Option<Weight> {
        self.fields
            .iter()
            .find(|f| f.name == field)
            .and_then(|f| f.weight)
    }

    /// Name of the GIN index created by `create_index`.
    pub fn gin_index_name(&self) -> String {
        let table = self.table.rsplit('.').next().unwrap_or(&self.table);
        format!("{}_{}_gin", table, self.column)
    }
}
