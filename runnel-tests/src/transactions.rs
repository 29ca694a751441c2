use crate::entities::{AuditRecord, audit_binding, guest_binding, guest_row};
use crate::mock::{MockPool, StatementKind};
use runnel_core::{
    DbmsType, Error, IsolationLevel, PersistenceProvider, Result, SqlStreamSupplier,
    TransactionHandler,
};
use std::sync::Arc;

fn kinds(pool: &MockPool) -> Vec<StatementKind> {
    pool.statements().into_iter().map(|s| s.kind).collect()
}

/// A successful unit of work commits once, after its statements.
pub async fn commit_on_success(dbms: Arc<dyn DbmsType>) {
    let pool = MockPool::new();
    let transactions = TransactionHandler::new(Arc::new(pool.clone()));
    let provider = PersistenceProvider::new(audit_binding(), dbms).expect("The provider builds");
    transactions
        .create_and_apply(async |tx| {
            let mut record = AuditRecord {
                message: "login".to_owned(),
                level: 3,
            };
            provider.persist(tx, &mut record).await?;
            Ok(())
        })
        .await
        .expect("The transaction commits");
    assert_eq!(
        kinds(&pool),
        vec![
            StatementKind::Begin(None),
            StatementKind::Insert {
                generated_key_columns: Vec::new(),
            },
            StatementKind::Commit,
        ]
    );
}

/// An error rolls the uncommitted portion back and surfaces unchanged.
pub async fn rollback_on_error(dbms: Arc<dyn DbmsType>) {
    let pool = MockPool::new();
    let transactions = TransactionHandler::new(Arc::new(pool.clone()));
    let provider = PersistenceProvider::new(audit_binding(), dbms).expect("The provider builds");
    let outcome: Result<()> = transactions
        .create_and_apply(async |tx| {
            let mut record = AuditRecord {
                message: "login".to_owned(),
                level: 3,
            };
            provider.persist(tx, &mut record).await?;
            Err(Error::msg("The unit of work failed"))
        })
        .await;
    assert!(outcome.is_err());
    let recorded = kinds(&pool);
    assert_eq!(recorded.first(), Some(&StatementKind::Begin(None)));
    assert_eq!(recorded.last(), Some(&StatementKind::Rollback));
    assert!(!recorded.contains(&StatementKind::Commit));
}

/// An action may roll back explicitly and still return a value; nothing is
/// committed afterwards.
pub async fn explicit_rollback(dbms: Arc<dyn DbmsType>) {
    let _ = dbms;
    let pool = MockPool::new();
    let transactions = TransactionHandler::new(Arc::new(pool.clone()));
    transactions
        .create_and_apply(async |tx| {
            tx.rollback().await?;
            Ok(())
        })
        .await
        .expect("The action itself succeeded");
    assert_eq!(
        kinds(&pool),
        vec![StatementKind::Begin(None), StatementKind::Rollback]
    );
}

/// The requested isolation level travels with BEGIN.
pub async fn isolation_level_applies(dbms: Arc<dyn DbmsType>) {
    let _ = dbms;
    let pool = MockPool::new();
    let transactions = TransactionHandler::new(Arc::new(pool.clone()))
        .with_isolation(IsolationLevel::Serializable);
    transactions
        .create_and_apply(async |_tx| Ok(()))
        .await
        .expect("The transaction commits");
    assert_eq!(
        kinds(&pool),
        vec![
            StatementKind::Begin(Some(IsolationLevel::Serializable)),
            StatementKind::Commit,
        ]
    );
}

/// Stream suppliers run against a transaction unchanged; rows are buffered
/// so the connection stays usable for the rest of the unit of work.
pub async fn streams_inside_transaction(dbms: Arc<dyn DbmsType>) {
    let pool = MockPool::new();
    pool.push_result_set(vec![guest_row(1, "Ada", 36, None)]);
    let transactions = TransactionHandler::new(Arc::new(pool.clone()));
    let supplier = SqlStreamSupplier::new(guest_binding(), dbms);
    let names = transactions
        .create_and_apply(async |tx| {
            let guests = supplier.stream(tx).collect_vec().await?;
            Ok(guests.into_iter().map(|g| g.name).collect::<Vec<_>>())
        })
        .await
        .expect("The transaction commits");
    assert_eq!(names, ["Ada"]);
    assert_eq!(
        kinds(&pool),
        vec![
            StatementKind::Begin(None),
            StatementKind::Query,
            StatementKind::Commit,
        ]
    );
}
