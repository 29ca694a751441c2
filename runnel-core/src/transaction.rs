use crate::{
    AsyncQueryResult, ConnectionPool, DbConnection, InsertResult, IsolationLevel, OperationHandler,
    Result, RowLabeled, Value,
};
use futures::stream;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// Wraps a unit of work in a transaction on one pooled connection.
///
/// The transaction handle is passed explicitly to the closure rather than
/// recovered from ambient thread state, so concurrent tasks cannot observe
/// each other's transactions by construction.
pub struct TransactionHandler<P: ConnectionPool> {
    pool: Arc<P>,
    isolation: Option<IsolationLevel>,
}

impl<P: ConnectionPool> TransactionHandler<P> {
    pub fn new(pool: Arc<P>) -> Self {
        Self {
            pool,
            isolation: None,
        }
    }

    pub fn with_isolation(mut self, isolation: IsolationLevel) -> Self {
        self.isolation = Some(isolation);
        self
    }

    /// BEGINs a transaction, runs `action` against it and COMMITs on success
    /// unless the action already rolled back. Any error rolls the
    /// uncommitted portion back and is returned untouched.
    pub async fn create_and_apply<R, F>(&self, action: F) -> Result<R>
    where
        F: AsyncFnOnce(&Transaction<P::Connection>) -> Result<R>,
    {
        let mut connection = self.pool.get_connection().await?;
        connection.begin(self.isolation).await?;
        let transaction = Transaction {
            connection: Mutex::new(connection),
            rolled_back: AtomicBool::new(false),
        };
        let outcome = action(&transaction).await;
        let rolled_back = transaction.rolled_back.load(Ordering::Acquire);
        let mut connection = transaction.connection.into_inner();
        match outcome {
            Ok(value) => {
                if !rolled_back {
                    connection.commit().await?;
                }
                Ok(value)
            }
            Err(error) => {
                if !rolled_back {
                    if let Err(rollback_error) = connection.rollback().await {
                        log::error!(
                            "Rollback failed after `{:#}`: {:#}",
                            error,
                            rollback_error
                        );
                    }
                }
                Err(error)
            }
        }
    }
}

/// A live transaction. Implements [`OperationHandler`], so stream suppliers
/// and persistence providers run inside it unchanged.
pub struct Transaction<C: DbConnection> {
    connection: Mutex<C>,
    rolled_back: AtomicBool,
}

impl<C: DbConnection> Transaction<C> {
    /// Rolls the transaction back early. The surrounding
    /// [`TransactionHandler::create_and_apply`] will not commit afterwards.
    pub async fn rollback(&self) -> Result<()> {
        self.connection.lock().await.rollback().await?;
        self.rolled_back.store(true, Ordering::Release);
        Ok(())
    }

    pub fn rolled_back(&self) -> bool {
        self.rolled_back.load(Ordering::Acquire)
    }
}

impl<C: DbConnection> OperationHandler for Transaction<C> {
    type Rows = stream::Iter<std::vec::IntoIter<Result<RowLabeled>>>;

    /// Buffered on purpose: the connection must stay usable for the rest of
    /// the transaction, so rows cannot own it the way pooled streams do.
    async fn execute_query_async(
        &self,
        sql: String,
        params: Vec<Value>,
    ) -> Result<AsyncQueryResult<Self::Rows>> {
        log::debug!("Executing query in transaction: {}", sql);
        let rows = self.connection.lock().await.query_all(&sql, &params).await?;
        let rows: Vec<Result<RowLabeled>> = rows.into_iter().map(Ok).collect();
        Ok(AsyncQueryResult::new(stream::iter(rows)))
    }

    async fn execute_insert(
        &self,
        sql: String,
        params: Vec<Value>,
        generated_key_columns: &[String],
    ) -> Result<InsertResult> {
        log::debug!("Executing insert in transaction: {}", sql);
        self.connection
            .lock()
            .await
            .insert(&sql, &params, generated_key_columns)
            .await
    }

    async fn execute_update(&self, sql: String, params: Vec<Value>) -> Result<u64> {
        log::debug!("Executing update in transaction: {}", sql);
        self.connection.lock().await.execute(&sql, &params).await
    }
}
