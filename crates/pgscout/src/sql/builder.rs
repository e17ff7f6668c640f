//! Statement builder for `tsvector` maintenance and ranked search.
//!
//! Every statement the engine issues is produced here, so the SQL text can be
//! checked without a database.

use crate::config::EngineConfig;
use crate::error::ConfigError;
use crate::types::{Filter, SearchIndex, SearchKey, SearchQuery, UnweightedFields, Weight};

use super::fragment::{SqlFragment, SqlParam, Statement, quote_ident, quote_literal};

/// A record field value handed to the vector builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    /// Field name, matched against the index's weights.
    pub name: String,
    /// Raw text. `None` is indexed as the empty string.
    pub value: Option<String>,
}

impl FieldValue {
    /// Creates a field value.
    pub fn new(name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            value: value.map(Into::into),
        }
    }
}

/// PostgreSQL full-text statement builder.
pub struct TsQueryBuilder;

impl TsQueryBuilder {
    /// Builds the weighted `tsvector` expression for one record.
    ///
    /// The first field is always vectorized. Later fields are included when
    /// they carry a weight, or unweighted when the index includes unweighted
    /// fields.
    pub fn vector_expression(
        index: &SearchIndex,
        config: &EngineConfig,
        fields: &[FieldValue],
    ) -> SqlFragment {
        let ts_config = config.ts_config(index);
        let parts: Vec<SqlFragment> = fields
            .iter()
            .enumerate()
            .filter_map(|(i, field)| {
                let weight = index.weight_of(&field.name);
                if !Self::includes(index, i, weight) {
                    return None;
                }

                let mut vector = SqlFragment::new("to_tsvector(");
                if let Some(cfg) = ts_config {
                    vector.push_param(cfg).push_sql("::text::regconfig, ");
                }
                vector
                    .push_param(field.value.clone().unwrap_or_default())
                    .push_sql(")");

                Some(match weight {
                    Some(w) => Self::set_weight(vector, w.as_str()),
                    None => vector,
                })
            })
            .collect();

        if parts.is_empty() {
            return SqlFragment::new("''::tsvector");
        }
        SqlFragment::join(parts, " || ")
    }

    /// Checks that a record's fields start with the index's primary field,
    /// so `update` and `rebuild` vectorize the same fields.
    pub fn check_fields(index: &SearchIndex, fields: &[FieldValue]) -> Result<(), ConfigError> {
        let Some(expected) = index.primary_field.as_deref() else {
            return Ok(());
        };
        match fields.first() {
            Some(first) if first.name == expected => Ok(()),
            first => Err(ConfigError::PrimaryFieldMismatch {
                table: index.table.clone(),
                expected: expected.to_string(),
                found: first.map(|f| f.name.clone()).unwrap_or_default(),
            }),
        }
    }

    /// Builds the expression used by a server side rebuild, reading each
    /// field from the column of the same name.
    ///
    /// The index must declare its primary field; fields are then selected
    /// exactly as [`vector_expression`](Self::vector_expression) selects a
    /// record's fields.
    pub fn column_vector_expression(
        index: &SearchIndex,
        config: &EngineConfig,
    ) -> Result<SqlFragment, ConfigError> {
        if index.listed_primary_field().is_none() {
            return Err(ConfigError::MissingPrimaryField {
                table: index.table.clone(),
            });
        }

        let ts_config = config.ts_config(index);
        let parts: Vec<SqlFragment> = index
            .fields
            .iter()
            .enumerate()
            .filter(|(i, field)| Self::includes(index, *i, field.weight))
            .map(|(_, field)| {
                let mut vector = SqlFragment::new("to_tsvector(");
                if let Some(cfg) = ts_config {
                    vector.push_param(cfg).push_sql("::text::regconfig, ");
                }
                vector.push_sql(&format!("COALESCE({}::text, '')", quote_ident(&field.name)));
                vector.push_sql(")");

                match field.weight {
                    Some(w) => Self::set_weight(vector, w.as_str()),
                    None => vector,
                }
            })
            .collect();

        Ok(SqlFragment::join(parts, " || "))
    }

    // The first field is always vectorized.
    fn includes(index: &SearchIndex, position: usize, weight: Option<Weight>) -> bool {
        position == 0 || weight.is_some() || index.unweighted_fields == UnweightedFields::Include
    }

    fn set_weight(vector: SqlFragment, label: &str) -> SqlFragment {
        let mut weighted = SqlFragment::new("setweight(");
        weighted
            .push_fragment(vector)
            .push_sql(&format!(", {})", quote_literal(label)));
        weighted
    }

    /// `SELECT (<expr>)::text AS tsvector`
    pub fn select_vector(expression: SqlFragment) -> Statement {
        let mut select = SqlFragment::new("SELECT (");
        select
            .push_fragment(expression)
            .push_sql(")::text AS tsvector");
        select.into_statement()
    }

    /// Writes a computed vector (and any extra columns) to the record's row.
    pub fn update_vector(
        index: &SearchIndex,
        key: &SearchKey,
        vector: &str,
        extra: &[(String, SqlParam)],
    ) -> Statement {
        let mut update = SqlFragment::new(format!(
            "UPDATE {} SET {} = ",
            quote_ident(&index.table),
            quote_ident(&index.column)
        ));
        update.push_param(vector).push_sql("::text::tsvector");
        for (column, value) in extra {
            update
                .push_sql(&format!(", {} = ", quote_ident(column)))
                .push_param(value.clone());
        }
        update
            .push_sql(&format!(" WHERE {} = ", quote_ident(&index.key_column)))
            .push_param(key.clone());
        update.into_statement()
    }

    /// Inserts the index row of an external index.
    pub fn insert_vector(
        index: &SearchIndex,
        key: &SearchKey,
        vector: &str,
        extra: &[(String, SqlParam)],
    ) -> Statement {
        let mut columns = vec![quote_ident(&index.key_column), quote_ident(&index.column)];
        columns.extend(extra.iter().map(|(c, _)| quote_ident(c)));

        let mut insert = SqlFragment::new(format!(
            "INSERT INTO {} ({}) VALUES (",
            quote_ident(&index.table),
            columns.join(", ")
        ));
        insert
            .push_param(key.clone())
            .push_sql(", ")
            .push_param(vector)
            .push_sql("::text::tsvector");
        for (_, value) in extra {
            insert.push_sql(", ").push_param(value.clone());
        }
        insert.push_sql(")");
        insert.into_statement()
    }

    /// Nulls the search column for every key in `keys`, in one statement.
    pub fn delete_vectors(index: &SearchIndex, keys: Vec<SearchKey>) -> Statement {
        let mut update = SqlFragment::new(format!(
            "UPDATE {} SET {} = NULL WHERE {} = ANY(",
            quote_ident(&index.table),
            quote_ident(&index.column),
            quote_ident(&index.key_column)
        ));
        update.push_param(SqlParam::Keys(keys)).push_sql(")");
        update.into_statement()
    }

    /// Nulls the search column on every row.
    pub fn flush(index: &SearchIndex) -> Statement {
        SqlFragment::new(format!(
            "UPDATE {} SET {} = NULL",
            quote_ident(&index.table),
            quote_ident(&index.column)
        ))
        .into_statement()
    }

    /// Recomputes the search column of every row from its field columns.
    pub fn rebuild(index: &SearchIndex, config: &EngineConfig) -> Result<Statement, ConfigError> {
        let mut update = SqlFragment::new(format!(
            "UPDATE {} SET {} = ",
            quote_ident(&index.table),
            quote_ident(&index.column)
        ));
        update.push_fragment(Self::column_vector_expression(index, config)?);
        Ok(update.into_statement())
    }

    /// Adds the `tsvector` column and its GIN index.
    pub fn create_index(index: &SearchIndex) -> Vec<Statement> {
        vec![
            SqlFragment::new(format!(
                "ALTER TABLE {} ADD COLUMN IF NOT EXISTS {} tsvector",
                quote_ident(&index.table),
                quote_ident(&index.column)
            ))
            .into_statement(),
            SqlFragment::new(format!(
                "CREATE INDEX IF NOT EXISTS {} ON {} USING GIN({})",
                quote_ident(&index.gin_index_name()),
                quote_ident(&index.table),
                quote_ident(&index.column)
            ))
            .into_statement(),
        ]
    }

    /// Drops the GIN index, keeping the column and its data.
    pub fn drop_index(index: &SearchIndex) -> Statement {
        let name = match index.table.rsplit_once('.') {
            Some((schema, _)) => format!("{}.{}", schema, index.gin_index_name()),
            None => index.gin_index_name(),
        };
        SqlFragment::new(format!("DROP INDEX IF EXISTS {}", quote_ident(&name))).into_statement()
    }

    /// Builds the ranked search query.
    ///
    /// ```text
    /// SELECT <key>, ts_rank(<column>, query) AS rank, COUNT(*) OVER () AS total_count
    /// FROM <table> CROSS JOIN plainto_tsquery($1) query
    /// WHERE <column> @@ query AND <filters...>
    /// ORDER BY rank DESC, <key> ASC
    /// LIMIT n OFFSET m
    /// ```
    pub fn search(query: &SearchQuery, config: &EngineConfig) -> Statement {
        let index = &query.index;
        let table = quote_ident(&index.table);
        let column = quote_ident(&index.column);
        let key = quote_ident(&index.key_column);

        let mut sql = SqlFragment::new(format!(
            "SELECT {}, {} AS rank, COUNT(*) OVER () AS total_count FROM {} CROSS JOIN {}(",
            key,
            Self::rank_expression(index, config, &column),
            table,
            config.parser(index).as_sql()
        ));
        if let Some(cfg) = config.ts_config(index) {
            sql.push_param(cfg).push_sql("::text::regconfig, ");
        }
        sql.push_param(query.text.as_str()).push_sql(") query");

        let mut conditions = vec![SqlFragment::new(format!("{} @@ query", column))];
        conditions.extend(query.filters.iter().map(Self::filter_condition));
        if query.exclude_soft_deleted {
            conditions.push(SqlFragment::new(format!(
                "{} IS NULL",
                quote_ident(&index.soft_delete_column)
            )));
        }
        sql.push_sql(" WHERE ")
            .push_fragment(SqlFragment::join(conditions, " AND "));

        let mut orders: Vec<String> = if query.orders.is_empty() {
            vec!["rank DESC".to_string()]
        } else {
            query
                .orders
                .iter()
                .map(|o| format!("{} {}", quote_ident(&o.column), o.direction.as_sql()))
                .collect()
        };
        orders.push(format!("{} ASC", key));
        sql.push_sql(&format!(" ORDER BY {}", orders.join(", ")));

        if let Some(limit) = query.limit {
            sql.push_sql(&format!(" LIMIT {}", limit));
        }
        sql.push_sql(&format!(" OFFSET {}", query.offset));

        sql.into_statement()
    }

    fn rank_expression(index: &SearchIndex, config: &EngineConfig, column: &str) -> String {
        let rank = config.rank(index);
        let mut args = Vec::with_capacity(4);
        if let Some(weights) = rank.weights {
            let list: Vec<String> = weights.iter().map(|w| w.to_string()).collect();
            args.push(format!("'{{{}}}'", list.join(",")));
        }
        args.push(column.to_string());
        args.push("query".to_string());
        if let Some(normalization) = rank.normalization {
            args.push(normalization.to_string());
        }
        format!("{}({})", rank.function.as_sql(), args.join(", "))
    }

    fn filter_condition(filter: &Filter) -> SqlFragment {
        match filter {
            Filter::Eq { column, value } => {
                let mut condition = SqlFragment::new(format!("{} = ", quote_ident(column)));
                condition.push_param(value.clone());
                condition
            }
            Filter::In { column, values } => {
                if values.is_empty() {
                    return SqlFragment::new("FALSE");
                }
                let mut condition = SqlFragment::new(format!("{} IN (", quote_ident(column)));
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        condition.push_sql(", ");
                    }
                    condition.push_param(value.clone());
                }
                condition.push_sql(")");
                condition
            }
            Filter::IsNull { column } => {
                SqlFragment::new(format!("{} IS NULL", quote_ident(column)))
            }
            Filter::Raw { sql, params } => {
                SqlFragment::with_params(format!("({})", sql), params.clone())
            }
        }
    }
}
