//! SQL fragments and bound parameters.
//!
//! Fragments are assembled with `?` placeholders so pieces can be combined
//! freely; [`SqlFragment::into_statement`] numbers them as `$1`, `$2`, ...
//! for PostgreSQL once the statement is complete.

use crate::types::SearchKey;

/// A SQL parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// Text parameter.
    Text(String),
    /// Floating point parameter.
    Float(f64),
    /// Integer parameter.
    Integer(i64),
    /// Boolean parameter.
    Bool(bool),
    /// JSON parameter.
    Json(serde_json::Value),
    /// A primary key.
    Key(SearchKey),
    /// An array of primary keys, for `= ANY(?)`.
    Keys(Vec<SearchKey>),
    /// Null parameter.
    Null,
}

impl SqlParam {
    /// Creates a text parameter.
    pub fn text(s: &str) -> Self {
        SqlParam::Text(s.to_string())
    }
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        SqlParam::Text(v.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        SqlParam::Text(v)
    }
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        SqlParam::Integer(v)
    }
}

impl From<i32> for SqlParam {
    fn from(v: i32) -> Self {
        SqlParam::Integer(i64::from(v))
    }
}

impl From<f64> for SqlParam {
    fn from(v: f64) -> Self {
        SqlParam::Float(v)
    }
}

impl From<bool> for SqlParam {
    fn from(v: bool) -> Self {
        SqlParam::Bool(v)
    }
}

impl From<SearchKey> for SqlParam {
    fn from(v: SearchKey) -> Self {
        SqlParam::Key(v)
    }
}

impl<T: Into<SqlParam>> From<Option<T>> for SqlParam {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlParam::Null)
    }
}

/// A SQL fragment with `?` placeholders and their parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SqlFragment {
    /// The SQL string with `?` placeholders.
    pub sql: String,
    /// The parameter values, in placeholder order.
    pub params: Vec<SqlParam>,
}

impl SqlFragment {
    /// Creates a new fragment with no parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Creates a fragment with parameters.
    pub fn with_params(sql: impl Into<String>, params: Vec<SqlParam>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Appends raw SQL text.
    pub fn push_sql(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Appends a `?` placeholder bound to `param`.
    pub fn push_param(&mut self, param: impl Into<SqlParam>) -> &mut Self {
        self.sql.push('?');
        self.params.push(param.into());
        self
    }

    /// Appends another fragment.
    pub fn push_fragment(&mut self, other: SqlFragment) -> &mut Self {
        self.sql.push_str(&other.sql);
        self.params.extend(other.params);
        self
    }

    /// Joins fragments with a separator.
    pub fn join(parts: Vec<SqlFragment>, separator: &str) -> SqlFragment {
        let mut joined = SqlFragment::default();
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                joined.push_sql(separator);
            }
            joined.push_fragment(part);
        }
        joined
    }

    /// Numbers the placeholders and produces an executable statement.
    pub fn into_statement(self) -> Statement {
        Statement {
            sql: number_placeholders(&self.sql),
            params: self.params,
        }
    }
}

/// A complete statement with `$N` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// SQL text.
    pub sql: String,
    /// Parameters, `params[0]` binds `$1`.
    pub params: Vec<SqlParam>,
}

/// Replaces every `?` outside quoted literals and identifiers with `$N`.
///
/// `??` stands for a literal `?`, for operators such as jsonb `?|`. Inside
/// `E'...'` strings a backslash escapes the next character.
fn number_placeholders(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut chars = sql.chars().peekable();
    let mut quote: Option<char> = None;
    let mut escapes = false;
    let mut prev: Option<char> = None;
    let mut n = 0;

    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                out.push(c);
                if escapes && c == '\\' {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' => {
                    escapes = c == '\'' && matches!(prev, Some('E' | 'e'));
                    quote = Some(c);
                    out.push(c);
                }
                '?' if chars.peek() == Some(&'?') => {
                    chars.next();
                    out.push('?');
                }
                '?' => {
                    n += 1;
                    out.push('$');
                    out.push_str(&n.to_string());
                }
                _ => out.push(c),
            },
        }
        prev = Some(c);
    }

    out
}

/// Quotes a possibly schema-qualified identifier: `public.posts` becomes
/// `"public"."posts"`.
pub fn quote_ident(name: &str) -> String {
    name.split('.')
        .map(|part| format!("\"{}\"", part.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(".")
}

/// Quotes a string literal.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(feature = "postgres")]
mod pg {
    use std::error::Error;

    use bytes::BytesMut;
    use postgres_types::{IsNull, ToSql, Type, to_sql_checked};

    use super::SqlParam;
    use crate::types::SearchKey;

    impl ToSql for SqlParam {
        fn to_sql(
            &self,
            ty: &Type,
            out: &mut BytesMut,
        ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
            match self {
                SqlParam::Null => Ok(IsNull::Yes),
                SqlParam::Text(v) => match *ty {
                    Type::UUID | Type::INT2 | Type::INT4 | Type::INT8 => {
                        SearchKey::Text(v.clone()).to_sql_checked(ty, out)
                    }
                    _ => v.to_sql_checked(ty, out),
                },
                SqlParam::Integer(v) => match *ty {
                    Type::FLOAT4 => (*v as f32).to_sql(ty, out),
                    Type::FLOAT8 => (*v as f64).to_sql(ty, out),
                    _ => SearchKey::Int(*v).to_sql_checked(ty, out),
                },
                SqlParam::Float(v) => match *ty {
                    Type::FLOAT4 => (*v as f32).to_sql(ty, out),
                    _ => v.to_sql_checked(ty, out),
                },
                SqlParam::Bool(v) => v.to_sql_checked(ty, out),
                SqlParam::Json(v) => v.to_sql_checked(ty, out),
                SqlParam::Key(v) => v.to_sql_checked(ty, out),
                SqlParam::Keys(v) => v.to_sql_checked(ty, out),
            }
        }

        // The column type is checked per variant by the inner value's
        // `to_sql_checked`.
        fn accepts(_ty: &Type) -> bool {
            true
        }

        to_sql_checked!();
    }
}
