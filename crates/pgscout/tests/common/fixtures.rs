//! Record fixtures.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use pgscout::error::LookupError;
use pgscout::{FieldValue, RecordSource, SearchIndex, SearchKey, Searchable, SqlParam, Weight};

/// A record with a primary text field and a weighted nullable field.
#[derive(Debug, Clone, PartialEq)]
pub struct TestModel {
    pub id: i64,
    pub text: String,
    pub nullable: Option<String>,
}

impl TestModel {
    pub fn new(id: i64, text: &str) -> Self {
        Self {
            id,
            text: text.to_string(),
            nullable: None,
        }
    }
}

impl Searchable for TestModel {
    fn search_index() -> SearchIndex {
        SearchIndex::new("table").with_weighted_field("nullable", Weight::B)
    }

    fn search_key(&self) -> SearchKey {
        SearchKey::Int(self.id)
    }

    fn to_searchable_fields(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::new("text", Some(self.text.as_str())),
            FieldValue::new("nullable", self.nullable.as_deref()),
        ]
    }
}

/// A soft-deletable record.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftDeleteModel {
    pub id: i64,
    pub text: String,
}

impl Searchable for SoftDeleteModel {
    fn search_index() -> SearchIndex {
        SearchIndex::new("table").soft_deletes()
    }

    fn search_key(&self) -> SearchKey {
        SearchKey::Int(self.id)
    }

    fn to_searchable_fields(&self) -> Vec<FieldValue> {
        vec![FieldValue::new("text", Some(self.text.as_str()))]
    }
}

/// A record whose index opts out of maintenance.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadOnlyModel {
    pub id: i64,
}

impl Searchable for ReadOnlyModel {
    fn search_index() -> SearchIndex {
        SearchIndex::new("table").with_maintain_index(false)
    }

    fn search_key(&self) -> SearchKey {
        SearchKey::Int(self.id)
    }

    fn to_searchable_fields(&self) -> Vec<FieldValue> {
        vec![FieldValue::new("text", Some("read only"))]
    }
}

/// A record whose fields do not start with the declared primary field.
#[derive(Debug, Clone, PartialEq)]
pub struct MisdeclaredModel {
    pub id: i64,
}

impl Searchable for MisdeclaredModel {
    fn search_index() -> SearchIndex {
        SearchIndex::new("table").with_primary_field("title", None)
    }

    fn search_key(&self) -> SearchKey {
        SearchKey::Int(self.id)
    }

    fn to_searchable_fields(&self) -> Vec<FieldValue> {
        vec![FieldValue::new("text", Some("untitled"))]
    }
}

/// A record indexed in a separate table, with an extra column.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalModel {
    pub id: i64,
    pub title: String,
    pub lang: String,
}

impl Searchable for ExternalModel {
    fn search_index() -> SearchIndex {
        SearchIndex::new("posts_search")
            .with_key_column("post_id")
            .with_column("vector")
            .with_primary_field("title", Some(Weight::A))
            .external()
    }

    fn search_key(&self) -> SearchKey {
        SearchKey::Int(self.id)
    }

    fn to_searchable_fields(&self) -> Vec<FieldValue> {
        vec![FieldValue::new("title", Some(self.title.as_str()))]
    }

    fn additional_columns(&self) -> Vec<(String, SqlParam)> {
        vec![("lang".to_string(), SqlParam::from(self.lang.as_str()))]
    }
}

/// In-memory record source counting its lookups.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Vec<TestModel>,
    lookups: Arc<AtomicUsize>,
}

impl InMemorySource {
    pub fn new(records: Vec<TestModel>) -> Self {
        Self {
            records,
            lookups: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordSource for InMemorySource {
    type Record = TestModel;

    async fn find_many(&self, keys: &[SearchKey]) -> Result<Vec<TestModel>, LookupError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .records
            .iter()
            .filter(|r| keys.contains(&r.search_key()))
            .cloned()
            .collect())
    }
}

/// A record source that always fails.
#[derive(Debug, Clone, Default)]
pub struct FailingSource;

#[async_trait]
impl RecordSource for FailingSource {
    type Record = TestModel;

    async fn find_many(&self, _keys: &[SearchKey]) -> Result<Vec<TestModel>, LookupError> {
        Err(LookupError::failed("source unavailable"))
    }
}
