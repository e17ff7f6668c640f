//! Search query specification.

use serde::{Deserialize, Serialize};

use crate::core::Searchable;
use crate::sql::SqlParam;

use super::SearchIndex;

/// Sort direction for custom ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// SQL keyword.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A custom `ORDER BY` clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderClause {
    /// Column to order by.
    pub column: String,
    /// Direction.
    #[serde(default)]
    pub direction: SortDirection,
}

/// A filter applied to the search, in caller order.
#[derive(Debug, Clone)]
pub enum Filter {
    /// `column = value`
    Eq {
        /// Column name.
        column: String,
        /// Bound value.
        value: SqlParam,
    },
    /// `column IN (values...)`. An empty list matches nothing.
    In {
        /// Column name.
        column: String,
        /// Bound values.
        values: Vec<SqlParam>,
    },
    /// `column IS NULL`
    IsNull {
        /// Column name.
        column: String,
    },
    /// Raw SQL with `?` placeholders bound to `params` in order.
    Raw {
        /// Condition text, wrapped in parentheses when rendered.
        sql: String,
        /// Bound values.
        params: Vec<SqlParam>,
    },
}

/// What to search for and how to page through it.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Index the query runs against.
    pub index: SearchIndex,
    /// Free-text query.
    pub text: String,
    /// Filters, applied in order.
    pub filters: Vec<Filter>,
    /// Custom ordering. When empty, results are ordered by rank.
    pub orders: Vec<OrderClause>,
    /// Rows to skip.
    pub offset: u64,
    /// Maximum rows to return.
    pub limit: Option<u64>,
    /// Exclude rows whose soft delete column is set. Defaults to the
    /// index's `soft_deletes` flag.
    pub exclude_soft_deleted: bool,
}

impl SearchQuery {
    /// Creates a query against an explicit index.
    pub fn new(index: SearchIndex, text: impl Into<String>) -> Self {
        let exclude_soft_deleted = index.soft_deletes;
        Self {
            index,
            text: text.into(),
            filters: Vec::new(),
            orders: Vec::new(),
            offset: 0,
            limit: None,
            exclude_soft_deleted,
        }
    }

    /// Creates a query against the index of a record type.
    pub fn for_type<R: Searchable>(text: impl Into<String>) -> Self {
        Self::new(R::search_index(), text)
    }

    /// Adds an equality filter.
    pub fn where_eq(mut self, column: impl Into<String>, value: impl Into<SqlParam>) -> Self {
        self.filters.push(Filter::Eq {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    /// Adds a membership filter.
    pub fn where_in<V: Into<SqlParam>>(
        mut self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.filters.push(Filter::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Adds an `IS NULL` filter.
    pub fn where_null(mut self, column: impl Into<String>) -> Self {
        self.filters.push(Filter::IsNull {
            column: column.into(),
        });
        self
    }

    /// Adds a raw filter. Use `?` for each bound parameter and `??` for a
    /// literal question mark, as in the jsonb operators `??`, `??|` and `??&`.
    pub fn where_raw(mut self, sql: impl Into<String>, params: Vec<SqlParam>) -> Self {
        self.filters.push(Filter::Raw {
            sql: sql.into(),
            params,
        });
        self
    }

    /// Adds a custom order clause.
    pub fn order_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.orders.push(OrderClause {
            column: column.into(),
            direction,
        });
        self
    }

    /// Sets the number of rows to skip.
    pub fn skip(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the maximum number of rows.
    pub fn take(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets limit and offset for a 1-based page number.
    pub fn for_page(mut self, per_page: u64, page: u64) -> Self {
        self.limit = Some(per_page);
        self.offset = page.saturating_sub(1).saturating_mul(per_page);
        self
    }

    /// Excludes soft-deleted rows.
    pub fn without_trashed(mut self) -> Self {
        self.exclude_soft_deleted = true;
        self
    }

    /// Includes soft-deleted rows.
    pub fn with_trashed(mut self) -> Self {
        self.exclude_soft_deleted = false;
        self
    }
}
