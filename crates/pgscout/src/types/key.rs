//! Primary key values.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The primary key of an indexed record.
///
/// Keys come back from the database in rank order and are used to look the
/// matching records up again, so they must be hashable and comparable.
/// JSON numbers deserialize as [`SearchKey::Int`], strings that parse as a
/// UUID as [`SearchKey::Uuid`], and any other string as [`SearchKey::Text`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchKey {
    /// Integer key (SMALLINT, INTEGER, BIGINT columns).
    Int(i64),
    /// UUID key.
    Uuid(Uuid),
    /// Text key (TEXT, VARCHAR, CHAR columns).
    Text(String),
}

impl fmt::Display for SearchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchKey::Int(v) => write!(f, "{}", v),
            SearchKey::Uuid(v) => write!(f, "{}", v),
            SearchKey::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for SearchKey {
    fn from(v: i64) -> Self {
        SearchKey::Int(v)
    }
}

impl From<i32> for SearchKey {
    fn from(v: i32) -> Self {
        SearchKey::Int(i64::from(v))
    }
}

impl From<Uuid> for SearchKey {
    fn from(v: Uuid) -> Self {
        SearchKey::Uuid(v)
    }
}

impl From<String> for SearchKey {
    fn from(v: String) -> Self {
        SearchKey::Text(v)
    }
}

impl From<&str> for SearchKey {
    fn from(v: &str) -> Self {
        SearchKey::Text(v.to_string())
    }
}

#[cfg(feature = "postgres")]
mod pg {
    use std::error::Error;

    use bytes::BytesMut;
    use postgres_types::{FromSql, IsNull, ToSql, Type, accepts, to_sql_checked};
    use uuid::Uuid;

    use super::SearchKey;

    type BoxError = Box<dyn Error + Sync + Send>;

    fn mismatch(key: &SearchKey, ty: &Type) -> BoxError {
        format!("cannot encode key '{}' as {}", key, ty).into()
    }

    impl ToSql for SearchKey {
        fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
            let text_column = <String as ToSql>::accepts(ty);
            match self {
                SearchKey::Int(v) => match *ty {
                    Type::INT2 => i16::try_from(*v)?.to_sql(ty, out),
                    Type::INT4 => i32::try_from(*v)?.to_sql(ty, out),
                    Type::INT8 => v.to_sql(ty, out),
                    _ if text_column => v.to_string().to_sql(ty, out),
                    _ => Err(mismatch(self, ty)),
                },
                SearchKey::Uuid(v) => match *ty {
                    Type::UUID => v.to_sql(ty, out),
                    _ if text_column => v.to_string().to_sql(ty, out),
                    _ => Err(mismatch(self, ty)),
                },
                SearchKey::Text(v) => match *ty {
                    Type::UUID => Uuid::parse_str(v)?.to_sql(ty, out),
                    Type::INT2 | Type::INT4 | Type::INT8 => {
                        SearchKey::Int(v.parse::<i64>()?).to_sql(ty, out)
                    }
                    _ if text_column => v.to_sql(ty, out),
                    _ => Err(mismatch(self, ty)),
                },
            }
        }

        fn accepts(ty: &Type) -> bool {
            matches!(*ty, Type::INT2 | Type::INT4 | Type::INT8 | Type::UUID)
                || <String as ToSql>::accepts(ty)
        }

        to_sql_checked!();
    }

    impl<'a> FromSql<'a> for SearchKey {
        fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
            match *ty {
                Type::INT2 => Ok(SearchKey::Int(i64::from(i16::from_sql(ty, raw)?))),
                Type::INT4 => Ok(SearchKey::Int(i64::from(i32::from_sql(ty, raw)?))),
                Type::INT8 => Ok(SearchKey::Int(i64::from_sql(ty, raw)?)),
                Type::UUID => Ok(SearchKey::Uuid(Uuid::from_sql(ty, raw)?)),
                _ => Ok(SearchKey::Text(String::from_sql(ty, raw)?)),
            }
        }

        accepts!(INT2, INT4, INT8, UUID, TEXT, VARCHAR, BPCHAR, NAME);
    }
}
