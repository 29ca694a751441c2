use crate::entities::{AuditRecord, Guest, Ticket, audit_binding, guest_binding, ticket_binding};
use crate::mock::{MockPool, StatementKind};
use runnel_core::{DbmsType, PersistenceProvider, PoolOperationHandler, Value};
use std::sync::Arc;

/// Generated keys come back in generated column order and are written into
/// the matching fields, converted through the column templates.
pub async fn generated_keys_round_trip(dbms: Arc<dyn DbmsType>) {
    let pool = MockPool::new();
    pool.push_generated_keys(vec![101, 1]);
    let handler = PoolOperationHandler::new(Arc::new(pool.clone()));
    let provider = PersistenceProvider::new(ticket_binding(), dbms).expect("The provider builds");
    let mut ticket = Ticket {
        id: 0,
        seq: 0,
        holder: "Ada".to_owned(),
    };
    provider
        .persist(&handler, &mut ticket)
        .await
        .expect("The insert runs");
    assert_eq!(ticket.id, 101);
    assert_eq!(ticket.seq, 1);
    let statements = pool.statements();
    assert_eq!(statements.len(), 1);
    assert!(statements[0].sql.starts_with("INSERT INTO "));
    // Generated columns get no slot in the value list.
    assert_eq!(
        statements[0].params,
        vec![Value::Varchar(Some("Ada".to_owned()))]
    );
    assert_eq!(
        statements[0].kind,
        StatementKind::Insert {
            generated_key_columns: vec!["id".to_owned(), "seq".to_owned()],
        }
    );
}

/// A key count differing from the auto increment field count is refused
/// instead of being assigned positionally.
pub async fn generated_key_count_mismatch(dbms: Arc<dyn DbmsType>) {
    let pool = MockPool::new();
    pool.push_generated_keys(vec![7]);
    let handler = PoolOperationHandler::new(Arc::new(pool.clone()));
    let provider = PersistenceProvider::new(ticket_binding(), dbms).expect("The provider builds");
    let mut ticket = Ticket {
        id: 0,
        seq: 0,
        holder: "Ada".to_owned(),
    };
    let outcome = provider.persist(&handler, &mut ticket).await;
    assert!(outcome.is_err());
    assert_eq!(ticket.id, 0, "A refused key assignment leaves the entity untouched");
}

/// update/remove/merge on a table without a primary key fail before any SQL
/// is issued.
pub async fn missing_primary_key_guard(dbms: Arc<dyn DbmsType>) {
    let pool = MockPool::new();
    let handler = PoolOperationHandler::new(Arc::new(pool.clone()));
    let provider = PersistenceProvider::new(audit_binding(), dbms).expect("The provider builds");
    let mut record = AuditRecord {
        message: "login".to_owned(),
        level: 3,
    };
    assert!(provider.update(&handler, &record).await.is_err());
    assert!(provider.remove(&handler, &record).await.is_err());
    assert!(provider.merge(&handler, &mut record).await.is_err());
    assert!(
        pool.statements().is_empty(),
        "The guard must fire before any SQL is issued"
    );
}

/// UPDATE binds the non key values first and the primary key last, matching
/// the SET then WHERE placeholder order; DELETE binds the key alone.
pub async fn update_and_remove_bind_order(dbms: Arc<dyn DbmsType>) {
    let pool = MockPool::new();
    let handler = PoolOperationHandler::new(Arc::new(pool.clone()));
    let provider = PersistenceProvider::new(guest_binding(), dbms).expect("The provider builds");
    let guest = Guest {
        id: 7,
        name: "Ada".to_owned(),
        age: 36,
        email: None,
    };
    let affected = provider
        .update(&handler, &guest)
        .await
        .expect("The update runs");
    assert_eq!(affected, 1);
    provider
        .remove(&handler, &guest)
        .await
        .expect("The delete runs");
    let statements = pool.statements();
    assert_eq!(statements.len(), 2);
    assert!(statements[0].sql.starts_with("UPDATE "));
    assert_eq!(
        statements[0].params,
        vec![
            Value::Varchar(Some("Ada".to_owned())),
            Value::Int64(Some(36)),
            Value::Varchar(None),
            Value::Int64(Some(7)),
        ]
    );
    assert!(statements[1].sql.starts_with("DELETE FROM "));
    assert_eq!(statements[1].params, vec![Value::Int64(Some(7))]);
}

/// merge updates in place and inserts only when no row matched the key.
pub async fn merge_inserts_when_missing(dbms: Arc<dyn DbmsType>) {
    let pool = MockPool::new();
    pool.set_rows_affected(0);
    pool.push_generated_keys(vec![42]);
    let handler = PoolOperationHandler::new(Arc::new(pool.clone()));
    let provider = PersistenceProvider::new(guest_binding(), dbms).expect("The provider builds");
    let mut guest = Guest {
        id: 0,
        name: "Ada".to_owned(),
        age: 36,
        email: None,
    };
    provider
        .merge(&handler, &mut guest)
        .await
        .expect("The merge runs");
    assert_eq!(guest.id, 42);
    let statements = pool.statements();
    assert_eq!(statements.len(), 2);
    assert!(statements[0].sql.starts_with("UPDATE "));
    assert!(matches!(statements[1].kind, StatementKind::Insert { .. }));
}
