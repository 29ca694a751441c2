use crate::entities::{count_row, guest_age_field, guest_binding, guest_name_field, guest_row};
use crate::mock::{MockPool, StatementKind};
use futures::StreamExt;
use runnel_core::{DbmsType, OperationHandler, PoolOperationHandler, SqlStreamSupplier, Value};
use std::sync::Arc;

fn supplier_over(dbms: Arc<dyn DbmsType>) -> (SqlStreamSupplier<crate::entities::Guest>, MockPool) {
    let pool = MockPool::new();
    let supplier = SqlStreamSupplier::new(guest_binding(), dbms);
    (supplier, pool)
}

/// A bare stream materializes the base SELECT and maps every row.
pub async fn select_and_collect(dbms: Arc<dyn DbmsType>) {
    let (supplier, pool) = supplier_over(dbms);
    pool.push_result_set(vec![
        guest_row(1, "Ada", 36, Some("ada@example.com")),
        guest_row(2, "Brendan", 28, None),
    ]);
    let handler = PoolOperationHandler::new(Arc::new(pool.clone()));
    let guests = supplier
        .stream(&handler)
        .collect_vec()
        .await
        .expect("The stream collects");
    assert_eq!(guests.len(), 2);
    assert_eq!(guests[0].name, "Ada");
    assert_eq!(guests[1].email, None);
    let statements = pool.statements();
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].kind, StatementKind::Query);
    assert!(statements[0].sql.starts_with("SELECT "));
    assert!(statements[0].sql.contains(" FROM "));
    assert!(!statements[0].sql.contains("WHERE"));
    assert_eq!(pool.cursors_released(), 1);
}

/// Leading field filters land in the WHERE clause; everything after the
/// first custom filter stays client side, including later field filters.
pub async fn filter_push_down(dbms: Arc<dyn DbmsType>) {
    let (supplier, pool) = supplier_over(dbms);
    pool.push_result_set(vec![
        guest_row(1, "Ada", 36, Some("ada@example.com")),
        guest_row(2, "Brendan", 28, None),
        guest_row(3, "Grace", 150, Some("grace@example.com")),
    ]);
    let handler = PoolOperationHandler::new(Arc::new(pool.clone()));
    let guests = supplier
        .stream(&handler)
        .filter(guest_age_field().greater_or_equal(21i64))
        .filter_fn(|g| g.email.is_some())
        .filter(guest_age_field().less_than(100i64))
        .collect_vec()
        .await
        .expect("The stream collects");
    // The mock does not evaluate SQL, so whatever survives here went through
    // the two client side filters only.
    assert_eq!(guests.len(), 1);
    assert_eq!(guests[0].name, "Ada");
    let statements = pool.statements();
    assert_eq!(statements.len(), 1);
    assert!(statements[0].sql.contains(" WHERE "));
    assert_eq!(statements[0].params, vec![Value::Int64(Some(21))]);
}

/// Field sorts and skip/limit are absorbed into ORDER BY and pagination
/// clauses, parameters in clause order.
pub async fn pagination_push_down(dbms: Arc<dyn DbmsType>) {
    let (supplier, pool) = supplier_over(dbms);
    pool.push_result_set(vec![guest_row(1, "Ada", 36, None)]);
    let handler = PoolOperationHandler::new(Arc::new(pool.clone()));
    let guests = supplier
        .stream(&handler)
        .sorted(guest_age_field().ascending())
        .skip(2)
        .limit(3)
        .collect_vec()
        .await
        .expect("The stream collects");
    assert_eq!(guests.len(), 1);
    let statements = pool.statements();
    assert_eq!(statements.len(), 1);
    let sql = &statements[0].sql;
    assert!(sql.contains(" ORDER BY "));
    assert!(sql.contains(" LIMIT ?"));
    assert!(sql.contains(" OFFSET ?"));
    assert_eq!(
        statements[0].params,
        vec![Value::Int64(Some(3)), Value::Int64(Some(2))]
    );
}

/// A fully pushed pipeline counts in the database, wrapped in a counting
/// sub-select.
pub async fn count_fast_path(dbms: Arc<dyn DbmsType>) {
    let (supplier, pool) = supplier_over(dbms);
    pool.push_result_set(vec![count_row(42)]);
    let handler = PoolOperationHandler::new(Arc::new(pool.clone()));
    let count = supplier
        .stream(&handler)
        .filter(guest_age_field().greater_or_equal(21i64))
        .count()
        .await
        .expect("The count query runs");
    assert_eq!(count, 42);
    let statements = pool.statements();
    assert_eq!(statements.len(), 1);
    assert!(statements[0].sql.starts_with("SELECT COUNT(*) FROM ("));
}

/// Any residual client side action forces the streamed count fallback.
pub async fn count_streamed_fallback(dbms: Arc<dyn DbmsType>) {
    let (supplier, pool) = supplier_over(dbms);
    pool.push_result_set(vec![
        guest_row(1, "Ada", 36, Some("ada@example.com")),
        guest_row(2, "Brendan", 28, None),
        guest_row(3, "Grace", 45, Some("grace@example.com")),
    ]);
    let handler = PoolOperationHandler::new(Arc::new(pool.clone()));
    let count = supplier
        .stream(&handler)
        .filter_fn(|g| g.email.is_some())
        .count()
        .await
        .expect("The streamed count runs");
    assert_eq!(count, 2);
    let statements = pool.statements();
    assert_eq!(statements.len(), 1);
    assert!(!statements[0].sql.contains("COUNT"));
}

/// `find_any` is a filter plus find-first pair, the predicate goes into the
/// WHERE clause and only the first row is consumed.
pub async fn find_any_binds_predicate(dbms: Arc<dyn DbmsType>) {
    let (supplier, pool) = supplier_over(dbms);
    pool.push_result_set(vec![
        guest_row(1, "Ada", 36, None),
        guest_row(2, "Brendan", 28, None),
    ]);
    let handler = PoolOperationHandler::new(Arc::new(pool.clone()));
    let found = supplier
        .find_any(&handler, guest_name_field().equal("Ada"))
        .await
        .expect("The lookup runs");
    assert_eq!(found.expect("A guest matches").id, 1);
    let statements = pool.statements();
    assert_eq!(statements.len(), 1);
    assert!(statements[0].sql.contains(" WHERE "));
    assert_eq!(
        statements[0].params,
        vec![Value::Varchar(Some("Ada".to_owned()))]
    );
    // find_first drops the cursor after one row.
    assert_eq!(pool.cursors_released(), 1);
}

/// Distinct, custom sorts and trailing pagination run in process when the
/// optimizer cannot absorb them.
pub async fn client_side_residuals(dbms: Arc<dyn DbmsType>) {
    let (supplier, pool) = supplier_over(dbms);
    pool.push_result_set(vec![
        guest_row(3, "Grace", 45, None),
        guest_row(1, "Ada", 36, None),
        guest_row(2, "Brendan", 28, None),
        guest_row(1, "Ada", 36, None),
    ]);
    let handler = PoolOperationHandler::new(Arc::new(pool.clone()));
    let guests = supplier
        .stream(&handler)
        .distinct()
        .sorted_by(|a, b| a.age.cmp(&b.age))
        .skip(1)
        .limit(2)
        .collect_vec()
        .await
        .expect("The stream collects");
    let names: Vec<&str> = guests.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, ["Ada", "Grace"]);
    let statements = pool.statements();
    assert_eq!(statements.len(), 1);
    assert!(!statements[0].sql.contains("LIMIT"));
}

/// Closing a stream twice releases the underlying cursor exactly once.
pub async fn close_releases_once() {
    let pool = MockPool::new();
    pool.push_result_set(vec![guest_row(1, "Ada", 36, None)]);
    let handler = PoolOperationHandler::new(Arc::new(pool.clone()));
    let mut result = handler
        .execute_query_async("SELECT 1".to_owned(), Vec::new())
        .await
        .expect("The query opens");
    let first = result.next().await;
    assert!(matches!(first, Some(Ok(..))));
    result.close();
    assert!(result.is_closed());
    result.close();
    drop(result);
    assert_eq!(pool.cursors_released(), 1);
}
