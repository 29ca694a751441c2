use crate::{AsyncQueryResult, Context, Result, RowLabeled, Value, stream::Stream};
use futures::StreamExt;
use std::future::Future;
use std::sync::Arc;

/// Transaction isolation guarantees, strongest last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

/// Outcome of an INSERT execution.
#[derive(Debug, Default, Clone)]
pub struct InsertResult {
    pub rows_affected: u64,
    /// Keys generated by the database, one per requested generated key
    /// column, in request order.
    pub generated_keys: Vec<i64>,
}

/// One live database connection, a consumed black-box capability implemented
/// by backend drivers (and by mocks in tests).
pub trait DbConnection: Send + Sized + 'static {
    type Rows: Stream<Item = Result<RowLabeled>> + Send + Unpin + 'static;

    /// Executes a SELECT, transferring ownership of the connection into the
    /// returned row stream. Dropping the stream releases the connection back
    /// to its pool.
    fn query(
        self,
        sql: String,
        params: Vec<Value>,
    ) -> impl Future<Output = Result<Self::Rows>> + Send;

    /// Buffered variant keeping the connection usable, what transactions run.
    fn query_all(
        &mut self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<Vec<RowLabeled>>> + Send;

    fn execute(
        &mut self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<u64>> + Send;

    /// Executes an INSERT, asking the driver for the generated values of the
    /// listed columns.
    fn insert(
        &mut self,
        sql: &str,
        params: &[Value],
        generated_key_columns: &[String],
    ) -> impl Future<Output = Result<InsertResult>> + Send;

    fn begin(
        &mut self,
        isolation: Option<IsolationLevel>,
    ) -> impl Future<Output = Result<()>> + Send;

    fn commit(&mut self) -> impl Future<Output = Result<()>> + Send;

    fn rollback(&mut self) -> impl Future<Output = Result<()>> + Send;
}

/// Hands out connections to one dbms. Acquisition may block until a pooled
/// connection frees up and may fail when the database is unreachable. Pool
/// internals (sizing, validation, reuse) are not this crate's concern.
pub trait ConnectionPool: Send + Sync + 'static {
    type Connection: DbConnection;

    fn get_connection(&self) -> impl Future<Output = Result<Self::Connection>> + Send;
}

/// Dialect agnostic execution primitives: parameterized query, insert,
/// update and delete execution, values bound positionally in statement text
/// order. Driver faults surface as errors carrying the offending statement,
/// they are never swallowed. Handlers are shared, effectively immutable
/// components.
pub trait OperationHandler: Send + Sync {
    type Rows: Stream<Item = Result<RowLabeled>> + Send + Unpin + 'static;

    /// Streaming query execution backed by an [`AsyncQueryResult`] that owns
    /// its resources for the duration of the consumption.
    fn execute_query_async(
        &self,
        sql: String,
        params: Vec<Value>,
    ) -> impl Future<Output = Result<AsyncQueryResult<Self::Rows>>> + Send;

    /// Buffered query execution.
    fn execute_query(
        &self,
        sql: String,
        params: Vec<Value>,
    ) -> impl Future<Output = Result<Vec<RowLabeled>>> + Send {
        async move {
            let mut rows = self.execute_query_async(sql, params).await?;
            let mut collected = Vec::new();
            while let Some(row) = rows.next().await {
                collected.push(row?);
            }
            rows.close();
            Ok(collected)
        }
    }

    /// Executes an INSERT and returns the generated keys of the listed
    /// columns.
    ///
    /// The keys are assumed to come back in column declaration order, which
    /// drivers commonly honor but no specification guarantees; callers must
    /// validate the key count before trusting positions.
    fn execute_insert(
        &self,
        sql: String,
        params: Vec<Value>,
        generated_key_columns: &[String],
    ) -> impl Future<Output = Result<InsertResult>> + Send;

    fn execute_update(
        &self,
        sql: String,
        params: Vec<Value>,
    ) -> impl Future<Output = Result<u64>> + Send;

    fn execute_delete(
        &self,
        sql: String,
        params: Vec<Value>,
    ) -> impl Future<Output = Result<u64>> + Send {
        self.execute_update(sql, params)
    }

    /// Large object factories. Values are owned in this model, so these are
    /// plain constructors kept for API parity with driver surfaces.
    fn create_blob(&self, bytes: Vec<u8>) -> Value {
        Value::Blob(Some(bytes.into_boxed_slice()))
    }

    fn create_clob(&self, text: String) -> Value {
        Value::Varchar(Some(text))
    }
}

/// The standard pool backed handler: one connection acquired per operation.
pub struct PoolOperationHandler<P: ConnectionPool> {
    pool: Arc<P>,
}

impl<P: ConnectionPool> PoolOperationHandler<P> {
    pub fn new(pool: Arc<P>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Arc<P> {
        &self.pool
    }
}

impl<P: ConnectionPool> OperationHandler for PoolOperationHandler<P> {
    type Rows = <P::Connection as DbConnection>::Rows;

    async fn execute_query_async(
        &self,
        sql: String,
        params: Vec<Value>,
    ) -> Result<AsyncQueryResult<Self::Rows>> {
        log::debug!("Executing query: {}", sql);
        let connection = self.pool.get_connection().await?;
        let context = format!("While executing the query: {}", sql);
        let rows = connection.query(sql, params).await.context(context)?;
        Ok(AsyncQueryResult::new(rows))
    }

    async fn execute_insert(
        &self,
        sql: String,
        params: Vec<Value>,
        generated_key_columns: &[String],
    ) -> Result<InsertResult> {
        log::debug!("Executing insert: {}", sql);
        let mut connection = self.pool.get_connection().await?;
        connection
            .insert(&sql, &params, generated_key_columns)
            .await
            .with_context(|| format!("While executing the insert: {}", sql))
    }

    async fn execute_update(&self, sql: String, params: Vec<Value>) -> Result<u64> {
        log::debug!("Executing update: {}", sql);
        let mut connection = self.pool.get_connection().await?;
        connection
            .execute(&sql, &params)
            .await
            .with_context(|| format!("While executing the update: {}", sql))
    }
}
