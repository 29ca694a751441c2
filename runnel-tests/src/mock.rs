use futures::stream::Stream;
use runnel_core::{
    ConnectionPool, DbConnection, InsertResult, IsolationLevel, Result, RowLabeled, Value,
};
use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    Query,
    Execute,
    Insert { generated_key_columns: Vec<String> },
    Begin(Option<IsolationLevel>),
    Commit,
    Rollback,
}

#[derive(Debug, Clone)]
pub struct RecordedStatement {
    pub kind: StatementKind,
    pub sql: String,
    pub params: Vec<Value>,
}

struct MockState {
    statements: Vec<RecordedStatement>,
    result_sets: VecDeque<Vec<RowLabeled>>,
    generated_keys: VecDeque<Vec<i64>>,
    rows_affected: u64,
    cursors_released: usize,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            statements: Vec::new(),
            result_sets: VecDeque::new(),
            generated_keys: VecDeque::new(),
            rows_affected: 1,
            cursors_released: 0,
        }
    }
}

/// In-memory stand-in for a driver's connection pool: records every executed
/// statement, serves canned result sets and counts cursor releases.
#[derive(Clone, Default)]
pub struct MockPool {
    state: Arc<Mutex<MockState>>,
}

impl MockPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the result set the next query will stream.
    pub fn push_result_set(&self, rows: Vec<RowLabeled>) {
        self.state.lock().unwrap().result_sets.push_back(rows);
    }

    /// Queues the generated keys the next insert will report.
    pub fn push_generated_keys(&self, keys: Vec<i64>) {
        self.state.lock().unwrap().generated_keys.push_back(keys);
    }

    pub fn set_rows_affected(&self, rows_affected: u64) {
        self.state.lock().unwrap().rows_affected = rows_affected;
    }

    pub fn statements(&self) -> Vec<RecordedStatement> {
        self.state.lock().unwrap().statements.clone()
    }

    pub fn cursors_released(&self) -> usize {
        self.state.lock().unwrap().cursors_released
    }
}

impl ConnectionPool for MockPool {
    type Connection = MockConnection;

    async fn get_connection(&self) -> Result<MockConnection> {
        Ok(MockConnection {
            state: self.state.clone(),
        })
    }
}

pub struct MockConnection {
    state: Arc<Mutex<MockState>>,
}

impl MockConnection {
    fn record(&self, kind: StatementKind, sql: &str, params: &[Value]) {
        self.state.lock().unwrap().statements.push(RecordedStatement {
            kind,
            sql: sql.to_owned(),
            params: params.to_vec(),
        });
    }

    fn next_rows(&self) -> Vec<RowLabeled> {
        self.state
            .lock()
            .unwrap()
            .result_sets
            .pop_front()
            .unwrap_or_default()
    }
}

impl DbConnection for MockConnection {
    type Rows = MockRows;

    async fn query(self, sql: String, params: Vec<Value>) -> Result<MockRows> {
        self.record(StatementKind::Query, &sql, &params);
        let rows = self.next_rows();
        Ok(MockRows {
            rows: rows.into(),
            state: self.state.clone(),
        })
    }

    async fn query_all(&mut self, sql: &str, params: &[Value]) -> Result<Vec<RowLabeled>> {
        self.record(StatementKind::Query, sql, params);
        Ok(self.next_rows())
    }

    async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64> {
        self.record(StatementKind::Execute, sql, params);
        let state = self.state.lock().unwrap();
        Ok(state.rows_affected)
    }

    async fn insert(
        &mut self,
        sql: &str,
        params: &[Value],
        generated_key_columns: &[String],
    ) -> Result<InsertResult> {
        self.record(
            StatementKind::Insert {
                generated_key_columns: generated_key_columns.to_vec(),
            },
            sql,
            params,
        );
        let mut state = self.state.lock().unwrap();
        Ok(InsertResult {
            rows_affected: state.rows_affected,
            generated_keys: state.generated_keys.pop_front().unwrap_or_default(),
        })
    }

    async fn begin(&mut self, isolation: Option<IsolationLevel>) -> Result<()> {
        self.record(StatementKind::Begin(isolation), "BEGIN", &[]);
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        self.record(StatementKind::Commit, "COMMIT", &[]);
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        self.record(StatementKind::Rollback, "ROLLBACK", &[]);
        Ok(())
    }
}

/// The canned row stream. Owns its connection state handle like a live
/// cursor owns its connection; dropping it counts as a release.
pub struct MockRows {
    rows: VecDeque<RowLabeled>,
    state: Arc<Mutex<MockState>>,
}

impl Stream for MockRows {
    type Item = Result<RowLabeled>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Poll::Ready(self.get_mut().rows.pop_front().map(Ok))
    }
}

impl Drop for MockRows {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.cursors_released += 1;
        }
    }
}
