//! Record side traits.

use async_trait::async_trait;

use crate::error::LookupError;
use crate::sql::{FieldValue, SqlParam};
use crate::types::{SearchIndex, SearchKey};

/// A record type whose rows carry a search vector.
///
/// # Example
///
/// ```
/// use pgscout::{FieldValue, SearchIndex, SearchKey, Searchable, Weight};
///
/// struct Post {
///     id: i64,
///     title: String,
///     summary: Option<String>,
/// }
///
/// impl Searchable for Post {
///     fn search_index() -> SearchIndex {
///         SearchIndex::new("posts").with_weighted_field("summary", Weight::B)
///     }
///
///     fn search_key(&self) -> SearchKey {
///         SearchKey::Int(self.id)
///     }
///
///     fn to_searchable_fields(&self) -> Vec<FieldValue> {
///         vec![
///             FieldValue::new("title", Some(self.title.as_str())),
///             FieldValue::new("summary", self.summary.as_deref()),
///         ]
///     }
/// }
/// ```
pub trait Searchable: Send + Sync {
    /// Index descriptor shared by every record of this type.
    fn search_index() -> SearchIndex
    where
        Self: Sized;

    /// Primary key.
    fn search_key(&self) -> SearchKey;

    /// Field values in vector order. The first entry is the primary field.
    fn to_searchable_fields(&self) -> Vec<FieldValue>;

    /// Extra columns written together with the vector.
    fn additional_columns(&self) -> Vec<(String, SqlParam)> {
        Vec::new()
    }
}

/// Loads records by key, used to turn search results into records.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Record type returned by the source.
    type Record: Searchable;

    /// Fetches the records with the given keys, in any order. Keys that do
    /// not resolve are simply absent from the result.
    async fn find_many(&self, keys: &[SearchKey]) -> Result<Vec<Self::Record>, LookupError>;
}
