//! A `SearchConnection` that records statements instead of running them.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use pgscout::error::{BackendError, EngineResult};
use pgscout::sql::Statement;
use pgscout::{SearchConnection, SearchRow};

/// Which connection method received a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Execute,
    QueryText,
    QueryRows,
}

/// One recorded call.
#[derive(Debug, Clone)]
pub struct Call {
    pub kind: CallKind,
    pub statement: Statement,
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<Call>,
    vectors: VecDeque<Option<String>>,
    affected: VecDeque<u64>,
    rows: Vec<SearchRow>,
    fail_on_call: Option<usize>,
}

/// Records statements and answers with canned values.
///
/// Defaults: `query_text` returns `'foo':1`, `execute` reports one affected
/// row, `query_rows` returns nothing.
#[derive(Debug, Clone, Default)]
pub struct RecordingConnection {
    state: Arc<Mutex<State>>,
}

impl RecordingConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows returned by every `query_rows` call.
    pub fn with_rows(self, rows: Vec<SearchRow>) -> Self {
        self.state.lock().rows = rows;
        self
    }

    /// Queues affected-row counts for successive `execute` calls.
    pub fn with_affected(self, counts: impl IntoIterator<Item = u64>) -> Self {
        self.state.lock().affected.extend(counts);
        self
    }

    /// Queues vectors for successive `query_text` calls.
    pub fn with_vectors(self, vectors: impl IntoIterator<Item = Option<String>>) -> Self {
        self.state.lock().vectors.extend(vectors);
        self
    }

    /// Makes the n-th call (0-based) fail.
    pub fn failing_on(self, call: usize) -> Self {
        self.state.lock().fail_on_call = Some(call);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    pub fn statements(&self) -> Vec<String> {
        self.state
            .lock()
            .calls
            .iter()
            .map(|c| c.statement.sql.clone())
            .collect()
    }

    fn record(&self, kind: CallKind, statement: &Statement) -> EngineResult<()> {
        let mut state = self.state.lock();
        let index = state.calls.len();
        state.calls.push(Call {
            kind,
            statement: statement.clone(),
        });
        if state.fail_on_call == Some(index) {
            return Err(BackendError::Internal {
                backend_name: "recording".to_string(),
                message: format!("injected failure on call {}", index),
                source: None,
            }
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl SearchConnection for RecordingConnection {
    async fn execute(&self, statement: &Statement) -> EngineResult<u64> {
        self.record(CallKind::Execute, statement)?;
        Ok(self.state.lock().affected.pop_front().unwrap_or(1))
    }

    async fn query_text(&self, statement: &Statement) -> EngineResult<Option<String>> {
        self.record(CallKind::QueryText, statement)?;
        Ok(self
            .state
            .lock()
            .vectors
            .pop_front()
            .unwrap_or_else(|| Some("'foo':1".to_string())))
    }

    async fn query_rows(&self, statement: &Statement) -> EngineResult<Vec<SearchRow>> {
        self.record(CallKind::QueryRows, statement)?;
        Ok(self.state.lock().rows.clone())
    }
}
